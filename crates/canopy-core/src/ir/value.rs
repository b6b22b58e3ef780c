use serde::{Deserialize, Serialize};

use super::ty::Type;

/// A constant literal value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Literal {
    pub fn ty(self) -> Type {
        match self {
            Literal::I32(_) => Type::I32,
            Literal::I64(_) => Type::I64,
            Literal::F32(_) => Type::F32,
            Literal::F64(_) => Type::F64,
        }
    }

    /// Truthiness for branch-condition purposes (zero is false).
    pub fn is_truthy(self) -> bool {
        match self {
            Literal::I32(v) => v != 0,
            Literal::I64(v) => v != 0,
            Literal::F32(v) => v != 0.0,
            Literal::F64(v) => v != 0.0,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::I32(v) => write!(f, "i32.const {v}"),
            Literal::I64(v) => write!(f, "i64.const {v}"),
            Literal::F32(v) => write!(f, "f32.const {v}"),
            Literal::F64(v) => write!(f, "f64.const {v}"),
        }
    }
}
