use serde::{Deserialize, Serialize};

use crate::entity::Arena;
use crate::error::CoreError;

use super::expr::{Expr, ExprId};
use super::func::{FuncId, Function};
use super::ty::Type;
use super::value::Literal;

/// A global variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    pub name: String,
    pub ty: Type,
    pub mutable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<Literal>,
}

/// A module — the top-level compilation unit.
///
/// All expressions of all functions live in one arena; functions reference
/// their body trees by [`ExprId`]. Rewrites relink ids; unlinked nodes are
/// reclaimed with the module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub functions: Arena<FuncId, Function>,
    pub globals: Vec<Global>,
    pub exprs: Arena<ExprId, Expr>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Arena::new(),
            globals: Vec::new(),
            exprs: Arena::new(),
        }
    }

    pub fn add_function(&mut self, func: Function) -> FuncId {
        self.functions.push(func)
    }

    pub fn add_global(&mut self, global: Global) {
        self.globals.push(global);
    }

    /// Serialize the module IR to JSON (debug dumps, snapshot fixtures).
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a module IR from its JSON dump.
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Builder;

    #[test]
    fn json_dump_round_trips() {
        let mut module = Module::new("m");
        let body = {
            let mut b = Builder::new(&mut module);
            let c = b.const_i32(7);
            b.drop_(c)
        };
        module.add_function(Function {
            name: "f".into(),
            params: vec![],
            result: Type::None,
            locals: vec![],
            body,
        });
        module.add_global(Global {
            name: "g".into(),
            ty: Type::I64,
            mutable: true,
            init: Some(Literal::I64(0)),
        });

        let text = module.to_json().unwrap();
        let reloaded = Module::from_json(&text).unwrap();
        assert_eq!(reloaded.name, "m");
        assert_eq!(reloaded.functions.len(), 1);
        assert_eq!(reloaded.globals.len(), 1);
        assert_eq!(reloaded.exprs.len(), module.exprs.len());
    }
}
