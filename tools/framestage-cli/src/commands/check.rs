//! Check encoder and storage availability.

use std::path::Path;

use framestage_common::AppConfig;
use framestage_encoder::{EncodeSettings, EncoderRuntime};
use framestage_staging::StorageLayout;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Framestage System Check");
    println!("{}", "=".repeat(50));

    let mut ready = true;

    // Encoder runtime
    match EncoderRuntime::initialize(config.encoder.ffmpeg_path.as_deref()) {
        Ok(runtime) => println!(
            "[OK] ffmpeg {} at {}",
            runtime.version(),
            runtime.binary().display()
        ),
        Err(e) => {
            ready = false;
            println!("[FAIL] {e}");
        }
    }

    match EncodeSettings::from_defaults(&config.encoder) {
        Ok(settings) => println!(
            "[OK] Encoder: {} ({}) {}x{} @ {} fps, {} bps",
            settings.kind,
            if settings.kind.is_hardware() {
                "hardware"
            } else {
                "software"
            },
            settings.width,
            settings.height,
            settings.fps,
            settings.bitrate()
        ),
        Err(e) => {
            ready = false;
            println!("[FAIL] {e}");
        }
    }

    // Storage
    match StorageLayout::resolve(&config.storage) {
        Ok(layout) => {
            println!("[OK] Staging directory: {}", layout.staging_dir().display());
            if !layout.root().exists() {
                println!("     (storage root does not exist yet and will be created)");
            }
        }
        Err(e) => {
            ready = false;
            println!("[FAIL] {e}");
        }
    }

    // Bundle
    let (bundle_ok, line) = bundle_status(&config.bundle.path);
    ready &= bundle_ok;
    println!("{line}");

    println!();
    if ready {
        println!("All checks passed. Framestage is ready.");
    } else {
        println!("Some checks failed. See above for details.");
    }

    Ok(())
}

/// Bundle check line; a missing directory fails the check.
fn bundle_status(path: &Path) -> (bool, String) {
    if path.is_dir() {
        (true, format!("[OK] Bundle: {}", path.display()))
    } else {
        (false, format!("[FAIL] Bundle directory missing: {}", path.display()))
    }
}
