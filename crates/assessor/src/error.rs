use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssessorError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid regex /{pattern}/{flags}: {reason}")]
    InvalidRegex {
        pattern: String,
        flags: String,
        reason: String,
    },

    #[error("Invalid label mapping entry {entry:?}: {reason}")]
    InvalidMapping { entry: String, reason: String },

    #[error("Prompt file not found: {}", path.display())]
    PromptNotFound { path: PathBuf },

    #[error("Prompt file {} is malformed: {reason}", path.display())]
    PromptMalformed { path: PathBuf, reason: String },

    #[error("Failed to create comment on issue #{issue}: {reason}")]
    CommentFailed { issue: u64, reason: String },

    #[error("Failed to write report: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AssessorError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    pub fn malformed_prompt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PromptMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Configuration problems are detected before any network call is made.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::MissingInput(_)
                | Self::InvalidRegex { .. }
                | Self::InvalidMapping { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AssessorError>;
