//! Stage one asset to an exact destination path.

use std::path::PathBuf;

use framestage_asset_bundle::AssetRef;
use framestage_common::AppConfig;
use framestage_staging::StagingCopier;

pub fn run(
    config: &AppConfig,
    asset: String,
    dest: PathBuf,
    bundle: Option<PathBuf>,
) -> anyhow::Result<()> {
    let bundle = super::open_bundle(config, bundle)?;
    let asset = AssetRef::from_path(&asset);

    let bytes = StagingCopier::new(&bundle)
        .stage_file(&asset, &dest)
        .map_err(|e| anyhow::anyhow!("Failed to stage {asset}: {e}"))?;

    println!("Staged {asset} -> {} ({bytes} bytes)", dest.display());
    Ok(())
}
