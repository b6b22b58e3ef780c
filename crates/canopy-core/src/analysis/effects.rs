//! Side-effect classification for expression trees.
//!
//! Effects are computed either *shallow* — attributable to a node's own
//! operation, excluding descendants — or *deep* — the node plus its whole
//! subtree. The pruning core checks shallow effects on the node it wants
//! to split (its children may be kept independently) and deep effects on
//! each child it considers discarding.

use serde::{Deserialize, Serialize};

use crate::ir::{Expr, ExprId, Module};

/// Tuning knobs for effect analysis.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Treat implicit traps (loads, stores, integer div/rem) as
    /// non-trapping.
    pub ignore_implicit_traps: bool,
    /// Assume no trap ever fires at runtime, including explicit
    /// `unreachable`.
    pub traps_never_happen: bool,
}

/// The set of effect categories a node (or subtree) may exhibit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideEffects {
    pub calls: bool,
    pub reads_local: bool,
    pub writes_local: bool,
    pub reads_global: bool,
    pub writes_global: bool,
    pub reads_memory: bool,
    pub writes_memory: bool,
    /// May trap at runtime.
    pub trap: bool,
    /// Branches out of the analyzed region.
    pub branches: bool,
    /// Returns from the enclosing function.
    pub returns: bool,
}

impl SideEffects {
    /// Effects of the node's own operation only.
    pub fn shallow(module: &Module, options: &AnalysisOptions, id: ExprId) -> SideEffects {
        let mut eff = SideEffects::default();
        eff.absorb_shallow(&module.exprs[id], options, &[]);
        eff
    }

    /// Effects of the node and all of its descendants.
    ///
    /// Branches resolved inside the subtree (a `br` targeting a label a
    /// nested block or loop defines) do not escape and are not reported.
    pub fn deep(module: &Module, options: &AnalysisOptions, id: ExprId) -> SideEffects {
        let mut eff = SideEffects::default();
        let mut scope: Vec<&str> = Vec::new();
        eff.walk(module, options, id, &mut scope);
        eff
    }

    /// Whether omitting this node would observably change behavior.
    ///
    /// Reads alone are removable; writes, calls, traps, and control
    /// transfers are not.
    pub fn has_unremovable_side_effects(&self) -> bool {
        self.calls
            || self.writes_local
            || self.writes_global
            || self.writes_memory
            || self.trap
            || self.branches
            || self.returns
    }

    /// Whether any effect at all was observed.
    pub fn has_any(&self) -> bool {
        self.has_unremovable_side_effects()
            || self.reads_local
            || self.reads_global
            || self.reads_memory
    }

    fn walk<'m>(
        &mut self,
        module: &'m Module,
        options: &AnalysisOptions,
        id: ExprId,
        scope: &mut Vec<&'m str>,
    ) {
        let expr = &module.exprs[id];
        self.absorb_shallow(expr, options, scope);

        let scoped_label = match expr {
            Expr::Block {
                label: Some(label), ..
            }
            | Expr::Loop {
                label: Some(label), ..
            } => {
                scope.push(label.as_str());
                true
            }
            _ => false,
        };

        for child in expr.children() {
            self.walk(module, options, child, scope);
        }

        if scoped_label {
            scope.pop();
        }
    }

    fn absorb_shallow(&mut self, expr: &Expr, options: &AnalysisOptions, scope: &[&str]) {
        let implicit_trap = !options.ignore_implicit_traps && !options.traps_never_happen;
        match expr {
            Expr::Nop
            | Expr::Const(_)
            | Expr::Block { .. }
            | Expr::Loop { .. }
            | Expr::If { .. }
            | Expr::Drop { .. }
            | Expr::Try { .. }
            | Expr::Pop { .. } => {}
            Expr::Unreachable => {
                if !options.traps_never_happen {
                    self.trap = true;
                }
            }
            Expr::LocalGet { .. } => self.reads_local = true,
            Expr::LocalSet { .. } => self.writes_local = true,
            Expr::GlobalGet { .. } => self.reads_global = true,
            Expr::GlobalSet { .. } => self.writes_global = true,
            Expr::Load { .. } => {
                self.reads_memory = true;
                self.trap |= implicit_trap;
            }
            Expr::Store { .. } => {
                self.writes_memory = true;
                self.trap |= implicit_trap;
            }
            Expr::Unary { .. } => {}
            Expr::Binary { op, .. } => {
                if op.can_trap() {
                    self.trap |= implicit_trap;
                }
            }
            // Callee effects are unknown; assume the worst.
            Expr::Call { .. } => self.calls = true,
            Expr::Br { label, .. } => {
                if !scope.iter().any(|l| *l == label.as_str()) {
                    self.branches = true;
                }
            }
            Expr::Return { .. } => self.returns = true,
        }
    }
}
