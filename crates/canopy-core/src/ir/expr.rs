use serde::{Deserialize, Serialize};

use crate::define_entity;

use super::ty::Type;
use super::value::Literal;

define_entity!(ExprId);

/// Integer/float binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Traps on division by zero.
    Div,
    /// Traps on division by zero.
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    /// Whether this operator can trap at runtime (integer div/rem by zero).
    pub fn can_trap(self) -> bool {
        matches!(self, BinaryOp::Div | BinaryOp::Rem)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Equals-zero test (result is i32).
    Eqz,
    Neg,
    Abs,
    /// Count leading zeros.
    Clz,
}

/// An expression node in the tree IR.
///
/// Expressions are stored in the module arena and reference their children
/// by [`ExprId`]. Child order is evaluation order, with one exception:
/// `If` evaluates its condition unconditionally but only one arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Does nothing.
    Nop,
    /// Unconditional trap.
    Unreachable,
    /// Constant literal.
    Const(Literal),
    /// Read a local variable.
    LocalGet { index: u32, ty: Type },
    /// Write a local variable.
    LocalSet { index: u32, value: ExprId },
    /// Read a global variable.
    GlobalGet { name: String, ty: Type },
    /// Write a global variable.
    GlobalSet { name: String, value: ExprId },
    /// Read from linear memory. May trap on an out-of-bounds address.
    Load { ptr: ExprId, ty: Type },
    /// Write to linear memory. May trap on an out-of-bounds address.
    Store { ptr: ExprId, value: ExprId },
    Unary {
        op: UnaryOp,
        operand: ExprId,
        ty: Type,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        ty: Type,
    },
    /// Direct call. Callee effects are unknown and assumed arbitrary.
    Call {
        target: String,
        args: Vec<ExprId>,
        ty: Type,
    },
    /// Ordered sequence of expressions; an optional label makes the block
    /// a branch target (branching to it exits the block).
    Block {
        label: Option<String>,
        items: Vec<ExprId>,
        ty: Type,
    },
    /// Loop; its label is a branch target (branching to it restarts the
    /// body).
    Loop {
        label: Option<String>,
        body: ExprId,
        ty: Type,
    },
    /// Conditional: the condition always executes, exactly one arm does.
    If {
        cond: ExprId,
        then_arm: ExprId,
        else_arm: Option<ExprId>,
        ty: Type,
    },
    /// Branch to a label. With `cond` this is a conditional branch
    /// (`br_if`) and falls through when the condition is zero.
    Br {
        label: String,
        value: Option<ExprId>,
        cond: Option<ExprId>,
    },
    /// Return from the enclosing function.
    Return { value: Option<ExprId> },
    /// Evaluate the operand for its effects and discard its value.
    Drop { value: ExprId },
    /// Exception scope: runs `body`; if it throws, runs `catch_body`.
    /// Structurally required wherever a `Pop` sits in its handler.
    Try {
        body: ExprId,
        catch_body: ExprId,
        ty: Type,
    },
    /// Receives the caught value; only legal directly inside a catch body.
    Pop { ty: Type },
}

impl Expr {
    /// The value type this expression produces.
    pub fn ty(&self) -> Type {
        match self {
            Expr::Nop
            | Expr::LocalSet { .. }
            | Expr::GlobalSet { .. }
            | Expr::Store { .. }
            | Expr::Drop { .. } => Type::None,
            Expr::Unreachable | Expr::Return { .. } => Type::Unreachable,
            // An unconditional br never falls through; br_if does.
            Expr::Br { cond, .. } => {
                if cond.is_some() {
                    Type::None
                } else {
                    Type::Unreachable
                }
            }
            Expr::Const(lit) => lit.ty(),
            Expr::LocalGet { ty, .. }
            | Expr::GlobalGet { ty, .. }
            | Expr::Load { ty, .. }
            | Expr::Unary { ty, .. }
            | Expr::Binary { ty, .. }
            | Expr::Call { ty, .. }
            | Expr::Block { ty, .. }
            | Expr::Loop { ty, .. }
            | Expr::If { ty, .. }
            | Expr::Try { ty, .. }
            | Expr::Pop { ty } => *ty,
        }
    }

    /// Immediate children in evaluation order.
    ///
    /// For `If` the condition comes first, then the arms — but only the
    /// condition executes unconditionally. For `Br` the carried value
    /// evaluates before the condition, matching the stack order.
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            Expr::Nop
            | Expr::Unreachable
            | Expr::Const(_)
            | Expr::LocalGet { .. }
            | Expr::GlobalGet { .. }
            | Expr::Pop { .. } => Vec::new(),
            Expr::LocalSet { value, .. }
            | Expr::GlobalSet { value, .. }
            | Expr::Drop { value } => vec![*value],
            Expr::Load { ptr, .. } => vec![*ptr],
            Expr::Store { ptr, value } => vec![*ptr, *value],
            Expr::Unary { operand, .. } => vec![*operand],
            Expr::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            Expr::Call { args, .. } => args.clone(),
            Expr::Block { items, .. } => items.clone(),
            Expr::Loop { body, .. } => vec![*body],
            Expr::If {
                cond,
                then_arm,
                else_arm,
                ..
            } => {
                let mut out = vec![*cond, *then_arm];
                out.extend(else_arm);
                out
            }
            Expr::Br { value, cond, .. } => {
                let mut out = Vec::new();
                out.extend(value);
                out.extend(cond);
                out
            }
            Expr::Return { value } => value.iter().copied().collect(),
            Expr::Try {
                body, catch_body, ..
            } => vec![*body, *catch_body],
        }
    }

    /// Mutable references to the child slots, in the same order as
    /// [`Expr::children`].
    pub fn children_mut(&mut self) -> Vec<&mut ExprId> {
        match self {
            Expr::Nop
            | Expr::Unreachable
            | Expr::Const(_)
            | Expr::LocalGet { .. }
            | Expr::GlobalGet { .. }
            | Expr::Pop { .. } => Vec::new(),
            Expr::LocalSet { value, .. }
            | Expr::GlobalSet { value, .. }
            | Expr::Drop { value } => vec![value],
            Expr::Load { ptr, .. } => vec![ptr],
            Expr::Store { ptr, value } => vec![ptr, value],
            Expr::Unary { operand, .. } => vec![operand],
            Expr::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Expr::Call { args, .. } => args.iter_mut().collect(),
            Expr::Block { items, .. } => items.iter_mut().collect(),
            Expr::Loop { body, .. } => vec![body],
            Expr::If {
                cond,
                then_arm,
                else_arm,
                ..
            } => {
                let mut out = vec![cond, then_arm];
                out.extend(else_arm.iter_mut());
                out
            }
            Expr::Br { value, cond, .. } => {
                let mut out = Vec::new();
                out.extend(value.iter_mut());
                out.extend(cond.iter_mut());
                out
            }
            Expr::Return { value } => value.iter_mut().collect(),
            Expr::Try {
                body, catch_body, ..
            } => vec![body, catch_body],
        }
    }
}
