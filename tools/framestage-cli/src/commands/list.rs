//! List assets under a bundle root.

use std::path::PathBuf;

use framestage_asset_bundle::{enumerate, AssetBundle};
use framestage_common::AppConfig;

pub fn run(config: &AppConfig, root: Option<String>, bundle: Option<PathBuf>) -> anyhow::Result<()> {
    let bundle = super::open_bundle(config, bundle)?;
    let root = root.unwrap_or_else(|| config.bundle.source_root.clone());

    let assets = enumerate(&bundle, &root);
    println!("Assets in {} under '{root}':", bundle.describe());
    if assets.is_empty() {
        println!("  (none)");
    }
    for asset in &assets {
        println!("  {}", asset.source_path());
    }
    println!("\n{} asset(s).", assets.len());

    Ok(())
}
