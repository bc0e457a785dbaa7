//! In-memory bundle, usable with `include_bytes!` tables.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};

use crate::bundle::{AssetBundle, AssetRef, BundleError};

/// Resources keyed by their full virtual path (`images/a.png`).
#[derive(Debug, Clone, Default)]
pub struct MemoryBundle {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bundle from a static table, e.g.
    /// `&[("images/logo.png", include_bytes!("logo.png"))]`.
    pub fn from_static(table: &[(&str, &[u8])]) -> Self {
        let mut bundle = Self::new();
        for (path, bytes) in table {
            bundle.insert(*path, bytes.to_vec());
        }
        bundle
    }

    /// Add or replace a resource.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let path = path.into().trim_matches('/').to_string();
        self.entries.insert(path, bytes.into());
    }

    /// Builder-style [`MemoryBundle::insert`].
    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn prefix(root: &str) -> String {
        let root = root.trim_matches('/');
        if root.is_empty() {
            String::new()
        } else {
            format!("{root}/")
        }
    }
}

impl AssetBundle for MemoryBundle {
    /// An unknown root lists as empty, like a packaged asset manager.
    fn list(&self, root: &str) -> Result<Vec<String>, BundleError> {
        let prefix = Self::prefix(root);
        let names: BTreeSet<&str> = self
            .entries
            .keys()
            .filter_map(|key| key.strip_prefix(prefix.as_str()))
            .filter_map(|rest| rest.split('/').next())
            .filter(|name| !name.is_empty())
            .collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }

    fn open(&self, asset: &AssetRef) -> Result<Box<dyn Read + '_>, BundleError> {
        let path = asset.source_path();
        match self.entries.get(&path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
            None => Err(BundleError::NotFound { path }),
        }
    }

    fn is_dir(&self, asset: &AssetRef) -> bool {
        let prefix = Self::prefix(&asset.source_path());
        self.entries.keys().any(|key| key.starts_with(&prefix))
    }

    fn describe(&self) -> String {
        format!("memory:{} entries", self.entries.len())
    }
}
