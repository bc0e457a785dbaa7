//! Stage the bundle root, then encode it.

use std::path::PathBuf;

use framestage_common::AppConfig;
use framestage_pipeline::{Pipeline, PipelineError};

pub fn run(
    config: &AppConfig,
    root: Option<String>,
    bundle: Option<PathBuf>,
    codec: Option<String>,
) -> anyhow::Result<()> {
    let bundle = super::open_bundle(config, bundle)?;
    let mut pipeline = Pipeline::from_config(&bundle, config)
        .map_err(|e| anyhow::anyhow!("Failed to resolve storage: {e}"))?;
    if let Some(root) = root {
        pipeline = pipeline.with_source_root(root);
    }
    let mut encoder = super::build_encoder(config, codec)?;

    match pipeline.run(&mut encoder) {
        Ok(outcome) => {
            super::stage::print_report(&outcome.report);
            println!("\nVideo written: {}", outcome.video.display());
            Ok(())
        }
        Err(PipelineError::Encode {
            staged_dir,
            report,
            source,
        }) => {
            super::stage::print_report(&report);
            Err(anyhow::anyhow!(
                "Encoding failed: {source}\nStaged files kept in {}",
                staged_dir.display()
            ))
        }
        Err(e) => Err(anyhow::anyhow!("{e}")),
    }
}
