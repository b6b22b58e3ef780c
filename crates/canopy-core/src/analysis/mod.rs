pub mod branch;
pub mod effects;

pub use branch::{defined_label, label_is_referenced};
pub use effects::{AnalysisOptions, SideEffects};
