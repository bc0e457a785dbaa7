//! Encode a directory of frames.

use std::path::PathBuf;

use framestage_common::AppConfig;

pub fn run(config: &AppConfig, dir: PathBuf, codec: Option<String>) -> anyhow::Result<()> {
    println!("Encoding frames in: {}", dir.display());

    let mut encoder = super::build_encoder(config, codec)?;
    let settings = encoder.settings();
    println!("  Codec: {}", settings.kind);
    println!(
        "  Resolution: {}x{} @ {} fps",
        settings.width, settings.height, settings.fps
    );

    let video = framestage_pipeline::encode_dir(&mut encoder, &dir)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("\nEncode complete: {}", video.display());
    Ok(())
}
