//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FramestageError, FramestageResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where staged assets are written.
    pub storage: StorageConfig,

    /// Where bundled assets are read from.
    pub bundle: BundleConfig,

    /// Default encoder settings.
    pub encoder: EncoderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Storage roots and the fixed staging layout below them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Application-private external storage root. `None` means not mounted.
    pub external_root: Option<PathBuf>,

    /// Internal storage root, used only when `fallback_to_internal` is set.
    pub internal_root: PathBuf,

    /// Public subdirectory below the storage root (e.g. "Download").
    pub public_subdir: String,

    /// Directory below the public subdirectory receiving staged assets.
    pub resource_dir: String,

    /// Use the internal root when external storage is unavailable.
    pub fallback_to_internal: bool,
}

/// Bundle location and the root to stage from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Directory holding the bundled assets.
    pub path: PathBuf,

    /// Source root inside the bundle. Empty means the bundle root.
    pub source_root: String,
}

/// Default encoding parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderDefaults {
    /// Encoder backend codec ("libx264", "h264_nvenc", "h264_vaapi", "h264_mediacodec").
    pub codec: String,

    /// Output width in pixels.
    pub width: u32,

    /// Output height in pixels.
    pub height: u32,

    /// Output frame rate.
    pub fps: u32,

    /// Quality factor; bitrate scales linearly with it.
    pub quality: u32,

    /// File name of the produced video, written beside the staged directory.
    pub output_file_name: String,

    /// Explicit ffmpeg binary. Looked up on `PATH` when unset.
    pub ffmpeg_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "framestage=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data = data_home().join("framestage");
        Self {
            external_root: Some(data.join("external")),
            internal_root: data.join("internal"),
            public_subdir: "Download".to_string(),
            resource_dir: "images".to_string(),
            fallback_to_internal: false,
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets"),
            source_root: "images".to_string(),
        }
    }
}

impl Default for EncoderDefaults {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            width: 640,
            height: 480,
            fps: 10,
            quality: 10,
            output_file_name: "output.mp4".to_string(),
            ffmpeg_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit file.
    pub fn load_from(path: &Path) -> FramestageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Reject layouts that would break the fixed staging path contract.
    pub fn validate(&self) -> FramestageResult<()> {
        for (field, value) in [
            ("storage.public_subdir", &self.storage.public_subdir),
            ("storage.resource_dir", &self.storage.resource_dir),
            ("encoder.output_file_name", &self.encoder.output_file_name),
        ] {
            if !is_single_component(value) {
                return Err(FramestageError::config(format!(
                    "{field} must be a single path component, got {value:?}"
                )));
            }
        }
        if self.encoder.fps == 0 {
            return Err(FramestageError::config("encoder.fps must be non-zero"));
        }
        Ok(())
    }

    /// Save config to the standard location.
    pub fn save(&self) -> FramestageResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> FramestageResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("framestage").join("config.json")
}

fn is_single_component(value: &str) -> bool {
    !value.is_empty() && value != "." && value != ".." && !value.contains(['/', '\\'])
}

fn data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"))
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}
