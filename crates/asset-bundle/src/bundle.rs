//! Bundle contract and asset references.

use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Reference to one bundled resource: the root it was listed under plus its
/// entry name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetRef {
    root: String,
    name: String,
}

impl AssetRef {
    pub fn new(root: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    /// Split a virtual path such as `images/a.png` at its last separator.
    ///
    /// A path without a separator refers to an entry at the bundle root.
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_matches('/');
        match path.rsplit_once('/') {
            Some((root, name)) => Self::new(root, name),
            None => Self::new("", path),
        }
    }

    /// Source root the entry was enumerated from (empty for the bundle root).
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Entry name, also used as the destination file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Virtual path inside the bundle: `name` at the root, `root/name` otherwise.
    pub fn source_path(&self) -> String {
        if self.root.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.root, self.name)
        }
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source_path())
    }
}

/// Read-only store of bundled resources.
pub trait AssetBundle {
    /// Names of the entries directly under `root` (one level, no recursion).
    fn list(&self, root: &str) -> Result<Vec<String>, BundleError>;

    /// Open a resource for reading.
    fn open(&self, asset: &AssetRef) -> Result<Box<dyn Read + '_>, BundleError>;

    /// Whether the entry is a nested directory rather than a resource.
    fn is_dir(&self, _asset: &AssetRef) -> bool {
        false
    }

    /// Short description used in log output.
    fn describe(&self) -> String;
}

/// Errors reported by bundle implementations.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Asset not found: {path}")]
    NotFound { path: String },

    #[error("Invalid asset path: {path}")]
    InvalidPath { path: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BundleError {
    /// Convert an I/O error, mapping `NotFound` onto the bundle's own variant.
    pub fn from_io(virtual_path: &str, path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: virtual_path.to_string(),
            }
        } else {
            Self::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_path_at_bundle_root() {
        let asset = AssetRef::new("", "a.png");
        assert_eq!(asset.source_path(), "a.png");
    }

    #[test]
    fn test_source_path_under_root() {
        let asset = AssetRef::new("images", "a.png");
        assert_eq!(asset.source_path(), "images/a.png");
        assert_eq!(asset.to_string(), "images/a.png");
    }

    #[test]
    fn test_from_path_splits_at_last_separator() {
        let asset = AssetRef::from_path("images/frames/00001-capture.jpg");
        assert_eq!(asset.root(), "images/frames");
        assert_eq!(asset.name(), "00001-capture.jpg");

        let bare = AssetRef::from_path("logo.png");
        assert_eq!(bare.root(), "");
        assert_eq!(bare.name(), "logo.png");
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let err = BundleError::from_io(
            "images/x.png",
            PathBuf::from("/b/images/x.png"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, BundleError::NotFound { ref path } if path == "images/x.png"));
    }
}
