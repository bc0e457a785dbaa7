pub mod check;
pub mod config;
pub mod encode;
pub mod list;
pub mod run;
pub mod stage;
pub mod stage_file;

use std::path::PathBuf;

use framestage_asset_bundle::DirBundle;
use framestage_common::AppConfig;
use framestage_encoder::{EncodeSettings, EncoderKind, EncoderRuntime, FfmpegEncoder};

/// Open the bundle directory, preferring the command-line override.
pub(crate) fn open_bundle(config: &AppConfig, bundle: Option<PathBuf>) -> anyhow::Result<DirBundle> {
    let path = bundle.unwrap_or_else(|| config.bundle.path.clone());
    if !path.is_dir() {
        return Err(anyhow::anyhow!(
            "Bundle directory not found: {}",
            path.display()
        ));
    }
    Ok(DirBundle::new(path))
}

/// Initialize the encoder runtime and build an ffmpeg encoder.
pub(crate) fn build_encoder(config: &AppConfig, codec: Option<String>) -> anyhow::Result<FfmpegEncoder> {
    let mut settings = EncodeSettings::from_defaults(&config.encoder)
        .map_err(|e| anyhow::anyhow!("Invalid encoder settings: {e}"))?;
    if let Some(codec) = codec {
        settings.kind = codec
            .parse::<EncoderKind>()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
    }

    let runtime = EncoderRuntime::initialize(config.encoder.ffmpeg_path.as_deref())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    FfmpegEncoder::new(runtime, settings).map_err(|e| anyhow::anyhow!("{e}"))
}
