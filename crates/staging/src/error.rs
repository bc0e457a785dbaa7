//! Staging errors.

use std::path::PathBuf;

use framestage_asset_bundle::BundleError;

/// Errors that stop a staging operation.
///
/// Per-entry problems during a batch never surface here; they are recorded
/// as [`crate::CopyOutcome::Failed`] instead.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("External storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Invalid staging layout: {message}")]
    InvalidLayout { message: String },

    #[error("Failed to create staging directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Staging path {path} exists and is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("Failed to remove existing file {path}: {source}")]
    RemoveExisting {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Copy(#[from] CopyError),
}

/// Why a single asset could not be copied.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("Cannot read {asset}: {source}")]
    Source { asset: String, source: BundleError },

    #[error("Cannot write {path}: {source}")]
    Destination {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Copy of {asset} to {path} interrupted: {source}")]
    Interrupted {
        asset: String,
        path: PathBuf,
        source: std::io::Error,
    },
}
