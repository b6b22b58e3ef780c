//! Branch-target queries.
//!
//! Labels are structured: a `Block` or `Loop` defines one, and every
//! branch that targets it sits somewhere inside that node's subtree. A
//! node that defines a label with live references must stay structurally
//! present, or those branches dangle and validation fails downstream.

use crate::ir::{Expr, ExprId, Module};

/// The branch-target label this node defines, if any.
pub fn defined_label(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Block {
            label: Some(label), ..
        }
        | Expr::Loop {
            label: Some(label), ..
        } => Some(label),
        _ => None,
    }
}

/// Whether any branch under `root` (exclusive of `root` itself) targets
/// `label`. Inner nodes redefining the same label shadow it, so branches
/// beneath them do not count.
pub fn label_is_referenced(module: &Module, root: ExprId, label: &str) -> bool {
    module.exprs[root]
        .children()
        .iter()
        .any(|&child| subtree_references(module, child, label))
}

fn subtree_references(module: &Module, id: ExprId, label: &str) -> bool {
    let expr = &module.exprs[id];
    if let Expr::Br { label: target, .. } = expr {
        if target == label {
            return true;
        }
    }
    // A redefinition captures all branches beneath it.
    if defined_label(expr) == Some(label) {
        return false;
    }
    expr.children()
        .iter()
        .any(|&child| subtree_references(module, child, label))
}
