use serde::{Deserialize, Serialize};

/// The value type of an expression.
///
/// Every expression is classified as producing a concrete value, executing
/// as a valueless statement (`None`), or never returning control
/// (`Unreachable` — it traps or diverges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// No value — a statement.
    None,
    /// Control never returns past this expression.
    Unreachable,
    /// 32-bit integer.
    I32,
    /// 64-bit integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl Type {
    /// A real value type — something a discard-wrapper would discard.
    pub fn is_concrete(self) -> bool {
        !matches!(self, Type::None | Type::Unreachable)
    }

    pub fn is_none(self) -> bool {
        self == Type::None
    }

    pub fn is_unreachable(self) -> bool {
        self == Type::Unreachable
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::None => write!(f, "none"),
            Type::Unreachable => write!(f, "unreachable"),
            Type::I32 => write!(f, "i32"),
            Type::I64 => write!(f, "i64"),
            Type::F32 => write!(f, "f32"),
            Type::F64 => write!(f, "f64"),
        }
    }
}
