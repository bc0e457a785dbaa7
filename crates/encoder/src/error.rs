//! Encoder errors.

use std::path::PathBuf;

/// Errors raised while initializing or running an encoder.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Encoder runtime unavailable: {message}")]
    RuntimeUnavailable { message: String },

    #[error("Invalid encode settings: {message}")]
    InvalidSettings { message: String },

    #[error("Invalid input directory {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    #[error("No encodable frames in {path}")]
    NoFrames { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{encoder} failed (status {status}): {stderr}")]
    Failed {
        encoder: String,
        status: String,
        stderr: String,
    },
}

impl EncodeError {
    pub fn invalid_settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: msg.into(),
        }
    }

    pub fn runtime_unavailable(msg: impl Into<String>) -> Self {
        Self::RuntimeUnavailable {
            message: msg.into(),
        }
    }
}
