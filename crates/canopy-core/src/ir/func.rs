use serde::{Deserialize, Serialize};

use crate::define_entity;

use super::expr::ExprId;
use super::ty::Type;

define_entity!(FuncId);

/// A function in the IR.
///
/// The body is a single expression tree rooted at `body`; locals are
/// indexed by position, with parameters occupying the first slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<Type>,
    pub result: Type,
    /// Types of non-parameter locals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locals: Vec<Type>,
    pub body: ExprId,
}

impl Function {
    /// Type of the local at `index` (parameters first, then locals).
    pub fn local_ty(&self, index: u32) -> Option<Type> {
        let index = index as usize;
        if index < self.params.len() {
            Some(self.params[index])
        } else {
            self.locals.get(index - self.params.len()).copied()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityRef;

    #[test]
    fn local_indices_span_params_then_locals() {
        let f = Function {
            name: "f".into(),
            params: vec![Type::I32, Type::F64],
            result: Type::None,
            locals: vec![Type::I64],
            body: ExprId::new(0),
        };
        assert_eq!(f.local_ty(0), Some(Type::I32));
        assert_eq!(f.local_ty(1), Some(Type::F64));
        assert_eq!(f.local_ty(2), Some(Type::I64));
        assert_eq!(f.local_ty(3), None);
    }
}
