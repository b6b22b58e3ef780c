pub mod const_fold;
pub mod value_pruning;

pub use const_fold::ConstantFolding;
pub use value_pruning::ValuePruning;

use crate::pipeline::{PassConfig, TransformPipeline};

/// Build a transform pipeline based on the given pass configuration.
pub fn default_pipeline(config: &PassConfig) -> TransformPipeline {
    let mut pipeline = TransformPipeline::new();
    if config.constant_folding {
        pipeline.add(Box::new(ConstantFolding));
    }
    if config.value_pruning {
        pipeline.add(Box::<ValuePruning>::default());
    }
    pipeline.set_fixpoint(config.fixpoint);
    pipeline
}
