//! Value pruning — removes computations whose results are discarded,
//! preserving their side effects.
//!
//! Works bottom-up over each function body. A `drop` of an expression
//! with no unremovable effects disappears entirely; otherwise the dropped
//! expression is decomposed into its effectful children where that is
//! structurally safe. Blocks are tidied along the way: `nop` items are
//! elided and trivial unlabeled blocks collapse.

use crate::analysis::effects::{AnalysisOptions, SideEffects};
use crate::error::CoreError;
use crate::ir::drop::{can_decompose, dropped_children_and_append};
use crate::ir::{Builder, Expr, ExprId, Module, Type};
use crate::pipeline::{Transform, TransformResult};

/// Value pruning transform.
#[derive(Default)]
pub struct ValuePruning {
    pub options: AnalysisOptions,
}

impl ValuePruning {
    pub fn with_options(options: AnalysisOptions) -> Self {
        Self { options }
    }
}

impl Transform for ValuePruning {
    fn name(&self) -> &str {
        "value-pruning"
    }

    fn apply(&self, mut module: Module) -> Result<TransformResult, CoreError> {
        let mut changed = false;
        for func_id in module.functions.keys().collect::<Vec<_>>() {
            let body = module.functions[func_id].body;
            let new_body = rewrite(&mut module, &self.options, body, &mut changed);
            if new_body != body {
                module.functions[func_id].body = new_body;
                changed = true;
            }
        }
        Ok(TransformResult { module, changed })
    }
}

/// Rewrite one node after its children; returns the node's replacement id.
fn rewrite(
    module: &mut Module,
    options: &AnalysisOptions,
    id: ExprId,
    changed: &mut bool,
) -> ExprId {
    let children = module.exprs[id].children();
    let mut new_children = Vec::with_capacity(children.len());
    for child in children {
        new_children.push(rewrite(module, options, child, changed));
    }
    for (slot, new_child) in module.exprs[id].children_mut().into_iter().zip(new_children) {
        if *slot != new_child {
            *slot = new_child;
            *changed = true;
        }
    }

    let dropped_value = match &module.exprs[id] {
        Expr::Drop { value } => Some(*value),
        _ => None,
    };
    if let Some(value) = dropped_value {
        return prune_drop(module, options, id, value, changed);
    }
    if matches!(module.exprs[id], Expr::Block { .. }) {
        return simplify_block(module, id, changed);
    }
    id
}

fn prune_drop(
    module: &mut Module,
    options: &AnalysisOptions,
    id: ExprId,
    value: ExprId,
    changed: &mut bool,
) -> ExprId {
    // Nothing observable anywhere in the subtree: the whole drop goes.
    if !SideEffects::deep(module, options, value).has_unremovable_side_effects() {
        module.exprs[id] = Expr::Nop;
        *changed = true;
        return id;
    }

    // An indivisible node is already in the shape we want, a single
    // dropped unit. Decide before allocating the replacement nop so an
    // unchanged pass run leaves the arena alone.
    if !can_decompose(value, module, options, Type::None) {
        return id;
    }
    let nop = Builder::new(module).nop();
    *changed = true;
    dropped_children_and_append(value, module, options, nop)
}

fn simplify_block(module: &mut Module, id: ExprId, changed: &mut bool) -> ExprId {
    let (label, items, ty) = match &module.exprs[id] {
        Expr::Block { label, items, ty } => (label.clone(), items.clone(), *ty),
        _ => return id,
    };

    let mut kept: Vec<ExprId> = Vec::with_capacity(items.len());
    for (i, &item) in items.iter().enumerate() {
        if !matches!(module.exprs[item], Expr::Nop) {
            kept.push(item);
            continue;
        }
        if i + 1 < items.len() {
            // Interior nop contributes nothing.
            continue;
        }
        // A trailing nop is removable only when the remaining tail already
        // gives the block its type.
        let tail_ty = kept
            .last()
            .map(|&e| module.exprs[e].ty())
            .unwrap_or(Type::None);
        if tail_ty == ty || tail_ty.is_unreachable() {
            continue;
        }
        kept.push(item);
    }

    if kept.len() != items.len() {
        *changed = true;
        if let Expr::Block { items, .. } = &mut module.exprs[id] {
            *items = kept.clone();
        }
    }

    if label.is_none() {
        if kept.is_empty() {
            module.exprs[id] = Expr::Nop;
            *changed = true;
            return id;
        }
        if kept.len() == 1 && module.exprs[kept[0]].ty() == ty {
            *changed = true;
            return kept[0];
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{print_expr, Function};

    fn run_once(module: Module) -> (Module, bool) {
        let result = ValuePruning::default().apply(module).unwrap();
        (result.module, result.changed)
    }

    fn make_func(module: &mut Module, body: ExprId) {
        module.add_function(Function {
            name: "test".into(),
            params: vec![],
            result: Type::None,
            locals: vec![Type::I32, Type::I32],
            body,
        });
    }

    fn body_text(module: &Module) -> String {
        let func_id = module.functions.keys().next().unwrap();
        print_expr(module, module.functions[func_id].body)
    }

    /// Dropping a pure computation removes it entirely.
    #[test]
    fn pure_drop_becomes_nop() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let x = b.local_get(0, Type::I32);
            let one = b.const_i32(1);
            let add = b.binary(crate::ir::BinaryOp::Add, x, one, Type::I32);
            b.drop_(add)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(changed);
        assert_eq!(body_text(&module), "(nop)");
    }

    /// Dropping a mixed computation keeps only the effectful operand.
    #[test]
    fn drop_decomposes_into_effectful_children() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let call = b.call("f", &[], Type::I32);
            let x = b.local_get(0, Type::I32);
            let add = b.binary(crate::ir::BinaryOp::Add, call, x, Type::I32);
            b.drop_(add)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(changed);
        assert_eq!(body_text(&module), "(block (drop (call $f)) (nop))");

        // A second run tidies the sequence down to the lone drop.
        let (module, _) = run_once(module);
        assert_eq!(body_text(&module), "(drop (call $f))");

        // And then it is stable.
        let (module, changed) = run_once(module);
        assert!(!changed);
        assert_eq!(body_text(&module), "(drop (call $f))");
    }

    /// A drop of a bare call is already minimal.
    #[test]
    fn minimal_drop_is_untouched() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let call = b.call("f", &[], Type::I32);
            b.drop_(call)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(!changed);
        assert_eq!(body_text(&module), "(drop (call $f))");
    }

    /// A run that changes nothing also allocates nothing.
    #[test]
    fn unchanged_run_leaves_arena_alone() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let cond = b.local_get(0, Type::I32);
            let a = b.call("a", &[], Type::I32);
            let c = b.call("b", &[], Type::I32);
            let if_ = b.if_(cond, a, Some(c), Type::I32);
            b.drop_(if_)
        };
        make_func(&mut module, body);

        let before = module.exprs.len();
        let (module, changed) = run_once(module);
        assert!(!changed);
        assert_eq!(module.exprs.len(), before);
    }

    /// A dropped conditional stays in one piece.
    #[test]
    fn dropped_if_is_not_split() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let cond = b.local_get(0, Type::I32);
            let a = b.call("a", &[], Type::I32);
            let c = b.call("b", &[], Type::I32);
            let if_ = b.if_(cond, a, Some(c), Type::I32);
            b.drop_(if_)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(!changed);
        assert_eq!(
            body_text(&module),
            "(drop (if (local.get 0) (call $a) (call $b)))"
        );
    }

    /// Interior nops are elided from blocks; pruned drops inside a block
    /// collapse away over a fixpoint run.
    #[test]
    fn block_nops_are_elided() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let n1 = b.nop();
            let call = b.call("f", &[], Type::None);
            let n2 = b.nop();
            let ret = b.return_(None);
            b.block(vec![n1, call, n2, ret])
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(changed);
        assert_eq!(body_text(&module), "(block (call $f) (return))");
    }

    /// Drops of pure values inside a block all vanish.
    #[test]
    fn pure_drops_in_block_vanish() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let x = b.local_get(0, Type::I32);
            let d1 = b.drop_(x);
            let y = b.local_get(1, Type::I32);
            let d2 = b.drop_(y);
            b.block(vec![d1, d2])
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(changed);
        // Both drops became nops, the block emptied, then became a nop.
        assert_eq!(body_text(&module), "(nop)");
    }
}
