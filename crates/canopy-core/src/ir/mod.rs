pub mod builder;
pub mod drop;
pub mod expr;
pub mod func;
pub mod module;
pub mod printer;
pub mod ty;
pub mod value;

pub use builder::Builder;
pub use drop::{
    can_decompose, dropped_children_and_append, dropped_unconditional_children_and_append,
};
pub use expr::{BinaryOp, Expr, ExprId, UnaryOp};
pub use func::{FuncId, Function};
pub use module::{Global, Module};
pub use printer::print_expr;
pub use ty::Type;
pub use value::Literal;
