use crate::error::CoreError;

/// Configuration for which transform passes to run.
///
/// All passes are enabled by default. Disable individual passes by setting
/// their fields to `false`, or use `from_skip_list` with pass name strings.
#[derive(Debug, Clone)]
pub struct PassConfig {
    pub constant_folding: bool,
    pub value_pruning: bool,
    /// When enabled, the pipeline repeats all passes until none report
    /// changes.
    pub fixpoint: bool,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            constant_folding: true,
            value_pruning: true,
            fixpoint: false,
        }
    }
}

impl PassConfig {
    /// Create a config with all passes enabled except those in the skip
    /// list. An unrecognized name is an error rather than a silent no-op.
    ///
    /// Pass names correspond to `Transform::name()` values:
    /// - `"constant-folding"`
    /// - `"value-pruning"`
    /// - `"fixpoint"` — toggles pipeline fixpoint iteration
    pub fn from_skip_list(skip: &[&str]) -> Result<Self, CoreError> {
        let mut config = Self::default();
        for name in skip {
            match *name {
                "constant-folding" => config.constant_folding = false,
                "value-pruning" => config.value_pruning = false,
                "fixpoint" => config.fixpoint = false,
                other => {
                    return Err(CoreError::Pass {
                        pass: other.to_string(),
                        message: "unknown pass name in skip list".to_string(),
                    })
                }
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_all_passes() {
        let config = PassConfig::default();
        assert!(config.constant_folding);
        assert!(config.value_pruning);
        assert!(!config.fixpoint);
    }

    #[test]
    fn skip_list_disables_passes() {
        let config = PassConfig::from_skip_list(&["constant-folding"]).unwrap();
        assert!(!config.constant_folding);
        assert!(config.value_pruning);
    }

    #[test]
    fn skip_list_rejects_unknown_names() {
        let err = PassConfig::from_skip_list(&["nonexistent"]).unwrap_err();
        assert!(matches!(err, CoreError::Pass { .. }));
    }
}
