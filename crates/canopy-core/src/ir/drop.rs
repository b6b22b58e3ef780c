//! Effect-preserving expression pruning.
//!
//! When a pass replaces or deletes an expression whose value is no longer
//! needed, descendants with side effects must still execute, in their
//! original order. The operations here keep the minimal set of children
//! required for that, discard the rest, and append a caller-supplied
//! trailing expression — typically whatever the original expression is
//! being replaced with.

use crate::analysis::branch::{defined_label, label_is_referenced};
use crate::analysis::effects::{AnalysisOptions, SideEffects};

use super::builder::Builder;
use super::expr::{Expr, ExprId};
use super::module::Module;
use super::ty::Type;

/// Replace `curr` with its effectful children followed by `last`.
///
/// Each immediate child is kept only if its deep effects are unremovable;
/// concrete survivors are wrapped in a drop, valueless or unreachable ones
/// are kept bare. `curr`'s own operation is discarded entirely, so this is
/// only sound when every child executes unconditionally and in order —
/// callers that cannot guarantee that must go through
/// [`dropped_unconditional_children_and_append`].
///
/// A lone survivor (including `last` itself) is returned unwrapped; a
/// sequence node is introduced only when there are at least two items.
pub fn dropped_children_and_append(
    curr: ExprId,
    module: &mut Module,
    options: &AnalysisOptions,
    last: ExprId,
) -> ExprId {
    let children = module.exprs[curr].children();
    let mut kept = Vec::with_capacity(children.len() + 1);
    for child in children {
        if !SideEffects::deep(module, options, child).has_unremovable_side_effects() {
            continue;
        }
        if module.exprs[child].ty().is_concrete() {
            kept.push(Builder::new(module).drop_(child));
        } else {
            // Valueless, or unreachable — either way nothing to drop.
            kept.push(child);
        }
    }
    kept.push(last);
    if kept.len() == 1 {
        return kept[0];
    }
    Builder::new(module).block(kept)
}

/// As [`dropped_children_and_append`], but only when it is structurally
/// safe to split `curr` into its children.
///
/// Splitting is unsafe when any of the following holds, and the whole of
/// `curr` is then kept as one opaque dropped unit instead:
///
/// 1. `curr`'s own operation has unremovable effects. This check is
///    shallow on purpose: effects in the children never block
///    decomposition, since the children are preserved individually.
/// 2. `curr` is an `if` — its arms execute conditionally, and emitting
///    them as sequential drops would run both unconditionally.
/// 3. `curr` is a `try` — removing it could orphan a `pop` that is only
///    legal inside its catch body.
/// 4. `curr` is a `pop` — structurally required where it stands.
/// 5. `curr` defines a branch label with live references; the branches
///    need their target to validate.
///
/// A trap in `curr`'s shallow effects is ignored when `last` is
/// unreachable-typed: the guaranteed trap in the replacement subsumes the
/// possible one in `curr`.
pub fn dropped_unconditional_children_and_append(
    curr: ExprId,
    module: &mut Module,
    options: &AnalysisOptions,
    last: ExprId,
) -> ExprId {
    let replacement_ty = module.exprs[last].ty();
    if !can_decompose(curr, module, options, replacement_ty) {
        let mut builder = Builder::new(module);
        let dropped = builder.drop_(curr);
        return builder.sequence(dropped, last);
    }
    dropped_children_and_append(curr, module, options, last)
}

/// Whether [`dropped_unconditional_children_and_append`] would split
/// `curr` rather than keep it whole, given the type of the expression
/// that will replace it. Allocates nothing, so callers can decide before
/// building their replacement.
pub fn can_decompose(
    curr: ExprId,
    module: &Module,
    options: &AnalysisOptions,
    replacement_ty: Type,
) -> bool {
    let mut effects = SideEffects::shallow(module, options, curr);
    if replacement_ty.is_unreachable() {
        effects.trap = false;
    }
    if effects.has_unremovable_side_effects() {
        return false;
    }
    if matches!(
        module.exprs[curr],
        Expr::If { .. } | Expr::Try { .. } | Expr::Pop { .. }
    ) {
        return false;
    }
    match defined_label(&module.exprs[curr]) {
        Some(label) => !label_is_referenced(module, curr, label),
        None => true,
    }
}
