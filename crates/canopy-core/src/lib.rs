//! canopy-core — optimization core for a structured, wasm-flavored tree IR.
//!
//! Expressions form a typed tree owned by a [`Module`] arena. The crate
//! provides the IR itself (`ir`), side-effect and branch-target analyses
//! (`analysis`), and rewrite passes (`transforms`) driven by a small
//! pipeline (`pipeline`).
//!
//! The centerpiece is `ir::drop`: when a pass decides an expression's
//! value is no longer needed, it cannot simply delete the node — some
//! descendants may have side effects that must still run, in order. The
//! pruning operations there compute the minimal set of children to keep,
//! discard the rest, and splice in the replacement expression.

pub mod analysis;
pub mod entity;
pub mod error;
pub mod ir;
pub mod pipeline;
pub mod transforms;

pub use error::CoreError;
pub use ir::{Builder, Expr, ExprId, FuncId, Function, Literal, Module, Type};
