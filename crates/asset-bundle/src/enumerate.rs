//! Resource enumerator.

use crate::bundle::{AssetBundle, AssetRef};

/// List the entries directly under `root`, sorted by name.
///
/// A listing failure is logged and yields no assets; it never aborts the
/// caller.
pub fn enumerate(bundle: &dyn AssetBundle, root: &str) -> Vec<AssetRef> {
    let mut names = match bundle.list(root) {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(
                bundle = %bundle.describe(),
                root,
                error = %e,
                "Failed to list bundle root, treating as empty"
            );
            return Vec::new();
        }
    };

    names.sort();
    names.dedup();

    tracing::debug!(root, count = names.len(), "Enumerated bundle root");
    names
        .into_iter()
        .map(|name| AssetRef::new(root, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleError;
    use crate::MemoryBundle;
    use std::io::Read;

    struct BrokenBundle;

    impl AssetBundle for BrokenBundle {
        fn list(&self, root: &str) -> Result<Vec<String>, BundleError> {
            Err(BundleError::NotFound {
                path: root.to_string(),
            })
        }

        fn open(&self, asset: &AssetRef) -> Result<Box<dyn Read + '_>, BundleError> {
            Err(BundleError::NotFound {
                path: asset.source_path(),
            })
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    #[test]
    fn test_listing_failure_yields_empty() {
        assert!(enumerate(&BrokenBundle, "images").is_empty());
    }

    #[test]
    fn test_entries_are_sorted_and_rooted() {
        let bundle = MemoryBundle::new()
            .with("images/c.png", vec![1])
            .with("images/a.png", vec![2])
            .with("images/b.png", vec![3]);

        let assets = enumerate(&bundle, "images");
        let paths: Vec<String> = assets.iter().map(AssetRef::source_path).collect();
        assert_eq!(paths, vec!["images/a.png", "images/b.png", "images/c.png"]);
    }

    #[test]
    fn test_empty_root_enumerates_bundle_root() {
        let bundle = MemoryBundle::new().with("a.png", vec![1]);
        let assets = enumerate(&bundle, "");
        assert_eq!(assets, vec![AssetRef::new("", "a.png")]);
        assert_eq!(assets[0].source_path(), "a.png");
    }
}
