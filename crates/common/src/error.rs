//! Error types shared across Framestage crates.
//!
//! Component crates carry their own error enums (`BundleError`,
//! `StagingError`, `EncodeError`); this type covers configuration and the
//! glue around them.

/// Top-level error type for Framestage operations.
#[derive(Debug, thiserror::Error)]
pub enum FramestageError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FramestageError.
pub type FramestageResult<T> = Result<T, FramestageError>;

impl FramestageError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
