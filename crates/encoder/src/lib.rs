//! Framestage Encoder
//!
//! The staging pipeline sees the encoder as one blocking call:
//! `encode(staged_dir) -> Result<video_path, EncodeError>`.
//!
//! ```text
//! EncoderRuntime::initialize()      (once per process)
//!          │
//!          ▼
//! <public dir>/images/*.jpg ──► FfmpegEncoder ──► <public dir>/output.mp4
//! ```

pub mod error;
pub mod ffmpeg;
pub mod frames;
pub mod runtime;
pub mod settings;

use std::path::{Path, PathBuf};

pub use error::*;
pub use ffmpeg::FfmpegEncoder;
pub use runtime::EncoderRuntime;
pub use settings::*;

/// Turns a directory of staged images into a video file.
pub trait Encoder {
    /// Encode every frame in `staged_dir`, returning the produced video path.
    fn encode(&mut self, staged_dir: &Path) -> Result<PathBuf, EncodeError>;

    /// Whether the backend can run on this machine.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}
