/// Core error type for the canopy framework.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("pass {pass}: {message}")]
    Pass { pass: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
