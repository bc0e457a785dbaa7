//! Storage layout and the staging directory path contract.

use std::path::{Path, PathBuf};

use framestage_common::StorageConfig;

use crate::error::StagingError;

/// Resolved location of the staging directory:
/// `<root>/<public_subdir>/<resource_dir>`.
///
/// Nothing time- or randomness-dependent goes into the path, so staging the
/// same inputs twice always targets the same directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
    public_subdir: String,
    resource_dir: String,
}

impl StorageLayout {
    pub fn new(
        root: impl Into<PathBuf>,
        public_subdir: impl Into<String>,
        resource_dir: impl Into<String>,
    ) -> Result<Self, StagingError> {
        let layout = Self {
            root: root.into(),
            public_subdir: public_subdir.into(),
            resource_dir: resource_dir.into(),
        };
        for name in [&layout.public_subdir, &layout.resource_dir] {
            validate_component(name).map_err(|message| StagingError::InvalidLayout { message })?;
        }
        Ok(layout)
    }

    /// Pick the storage root from configuration.
    ///
    /// A missing external root is an error unless the configuration opts into
    /// falling back to internal storage.
    pub fn resolve(storage: &StorageConfig) -> Result<Self, StagingError> {
        let root = match &storage.external_root {
            Some(root) => root.clone(),
            None if storage.fallback_to_internal => {
                tracing::warn!(
                    internal_root = %storage.internal_root.display(),
                    "External storage unavailable, falling back to internal storage"
                );
                storage.internal_root.clone()
            }
            None => {
                return Err(StagingError::StorageUnavailable {
                    message: "no external storage root configured (set storage.external_root or storage.fallback_to_internal)".to_string(),
                });
            }
        };
        Self::new(root, &storage.public_subdir, &storage.resource_dir)
    }

    /// Storage root the layout hangs off.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<public_subdir>`; the encoder writes its output here.
    pub fn public_dir(&self) -> PathBuf {
        self.root.join(&self.public_subdir)
    }

    /// `<root>/<public_subdir>/<resource_dir>`; staged assets land here.
    pub fn staging_dir(&self) -> PathBuf {
        self.public_dir().join(&self.resource_dir)
    }
}

/// Check that `name` can be used as one path component below a directory.
pub fn validate_component(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name is empty".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("{name:?} refers to a directory, not an entry"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(format!("{name:?} contains a path separator"));
    }
    Ok(())
}
