use crate::error::CoreError;
use crate::ir::Module;

/// Upper bound on fixpoint iterations; passes that ping-pong instead of
/// converging stop here rather than spinning.
const MAX_FIXPOINT_ITERATIONS: usize = 16;

/// Transform trait — a pass that rewrites IR modules.
///
/// Examples: constant folding, value pruning.
pub trait Transform {
    /// Name of this transform pass.
    fn name(&self) -> &str;

    /// Apply this transform to a module, returning the transformed module
    /// and whether anything changed.
    fn apply(&self, module: Module) -> Result<TransformResult, CoreError>;
}

/// Result of applying a transform.
pub struct TransformResult {
    pub module: Module,
    pub changed: bool,
}

/// An ordered sequence of transforms to apply.
pub struct TransformPipeline {
    transforms: Vec<Box<dyn Transform>>,
    fixpoint: bool,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
            fixpoint: false,
        }
    }

    pub fn add(&mut self, transform: Box<dyn Transform>) {
        self.transforms.push(transform);
    }

    /// When enabled, the whole pass list repeats until no pass reports a
    /// change (bounded by an iteration cap).
    pub fn set_fixpoint(&mut self, fixpoint: bool) {
        self.fixpoint = fixpoint;
    }

    /// Run all transforms in order on the given module.
    pub fn run(&self, mut module: Module) -> Result<Module, CoreError> {
        for _ in 0..MAX_FIXPOINT_ITERATIONS {
            let mut changed = false;
            for transform in &self.transforms {
                let result = transform.apply(module)?;
                module = result.module;
                changed |= result.changed;
            }
            if !self.fixpoint || !changed {
                break;
            }
        }
        Ok(module)
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}
