//! Bundle backed by a directory on disk.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use crate::bundle::{AssetBundle, AssetRef, BundleError};

/// Serves assets from `base`, treating each subdirectory as a source root.
#[derive(Debug, Clone)]
pub struct DirBundle {
    base: PathBuf,
}

impl DirBundle {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Directory the bundle reads from.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Map a virtual path onto the filesystem, rejecting anything that would
    /// leave `base`.
    fn resolve(&self, virtual_path: &str) -> Result<PathBuf, BundleError> {
        let relative = Path::new(virtual_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(BundleError::InvalidPath {
                path: virtual_path.to_string(),
            });
        }
        Ok(self.base.join(relative))
    }
}

impl AssetBundle for DirBundle {
    fn list(&self, root: &str) -> Result<Vec<String>, BundleError> {
        let dir = self.resolve(root)?;
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| BundleError::from_io(root, dir.clone(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BundleError::Io {
                path: dir.clone(),
                source: e,
            })?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!(name = ?raw, dir = %dir.display(), "Ignoring non UTF-8 bundle entry");
                }
            }
        }
        Ok(names)
    }

    fn open(&self, asset: &AssetRef) -> Result<Box<dyn Read + '_>, BundleError> {
        let virtual_path = asset.source_path();
        let path = self.resolve(&virtual_path)?;
        let file = File::open(&path).map_err(|e| BundleError::from_io(&virtual_path, path, e))?;
        Ok(Box::new(file))
    }

    fn is_dir(&self, asset: &AssetRef) -> bool {
        self.resolve(&asset.source_path())
            .map(|path| path.is_dir())
            .unwrap_or(false)
    }

    fn describe(&self) -> String {
        format!("dir:{}", self.base.display())
    }
}
