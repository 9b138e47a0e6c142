use thiserror::Error;

/// Inference endpoint error types
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Inference API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Inference endpoint rate limited")]
    RateLimited,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for inference operations
pub type InferenceResult<T> = Result<T, InferenceError>;
