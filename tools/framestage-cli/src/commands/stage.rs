//! Stage a bundle root into the staging directory.

use std::path::PathBuf;

use framestage_common::AppConfig;
use framestage_pipeline::Pipeline;
use framestage_staging::{CopyOutcome, StagingReport};

pub fn run(
    config: &AppConfig,
    root: Option<String>,
    bundle: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let bundle = super::open_bundle(config, bundle)?;
    let mut pipeline = Pipeline::from_config(&bundle, config)
        .map_err(|e| anyhow::anyhow!("Failed to resolve storage: {e}"))?;
    if let Some(root) = root {
        pipeline = pipeline.with_source_root(root);
    }

    let report = pipeline
        .stage()
        .map_err(|e| anyhow::anyhow!("Staging failed: {e}"))?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    Ok(())
}

pub(crate) fn print_report(report: &StagingReport) {
    println!("Staged into: {}", report.target_dir().display());
    for entry in report.entries() {
        match &entry.outcome {
            CopyOutcome::Copied { bytes } => println!("  [OK]   {} ({bytes} bytes)", entry.asset),
            CopyOutcome::Skipped { reason } => println!("  [SKIP] {} ({reason})", entry.asset),
            CopyOutcome::Failed { reason } => println!("  [FAIL] {}: {reason}", entry.asset),
        }
    }
    println!(
        "\n{} copied, {} skipped, {} failed ({} bytes).",
        report.copied(),
        report.skipped(),
        report.failed(),
        report.bytes_copied()
    );
}
