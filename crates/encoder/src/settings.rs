//! Encoder selection and encode parameters.

use std::fmt;
use std::str::FromStr;

use framestage_common::EncoderDefaults;
use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

/// Bits per second contributed by each quality step.
pub const BITRATE_QUALITY_SCALE: u64 = 200_000;

/// Render node used for VAAPI encoding.
pub const VAAPI_DEVICE: &str = "/dev/dri/renderD128";

/// H.264 encoder implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EncoderKind {
    Vaapi,
    Nvenc,
    MediaCodec,
    #[default]
    Libx264,
}

impl EncoderKind {
    /// ffmpeg codec name.
    pub fn codec_name(self) -> &'static str {
        match self {
            Self::Vaapi => "h264_vaapi",
            Self::Nvenc => "h264_nvenc",
            Self::MediaCodec => "h264_mediacodec",
            Self::Libx264 => "libx264",
        }
    }

    pub fn is_hardware(self) -> bool {
        !matches!(self, Self::Libx264)
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codec_name())
    }
}

impl FromStr for EncoderKind {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vaapi" | "h264_vaapi" => Ok(Self::Vaapi),
            "nvenc" | "h264_nvenc" => Ok(Self::Nvenc),
            "mediacodec" | "h264_mediacodec" => Ok(Self::MediaCodec),
            "x264" | "libx264" => Ok(Self::Libx264),
            other => Err(EncodeError::invalid_settings(format!(
                "unknown encoder: {other}. Use: libx264, nvenc, vaapi, mediacodec"
            ))),
        }
    }
}

/// Parameters for one encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSettings {
    pub kind: EncoderKind,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub quality: u32,
    /// Output file name, placed beside the staged directory.
    pub output_file_name: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            kind: EncoderKind::default(),
            width: 640,
            height: 480,
            fps: 10,
            quality: 10,
            output_file_name: "output.mp4".to_string(),
        }
    }
}

impl EncodeSettings {
    /// Build settings from the configuration section.
    pub fn from_defaults(defaults: &EncoderDefaults) -> Result<Self, EncodeError> {
        let settings = Self {
            kind: defaults.codec.parse()?,
            width: defaults.width,
            height: defaults.height,
            fps: defaults.fps,
            quality: defaults.quality,
            output_file_name: defaults.output_file_name.clone(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.width == 0 || self.height == 0 {
            return Err(EncodeError::invalid_settings(
                "width/height must be non-zero",
            ));
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(EncodeError::invalid_settings(
                "width/height must be even (required for yuv420p output)",
            ));
        }
        if self.fps == 0 {
            return Err(EncodeError::invalid_settings("fps must be non-zero"));
        }
        if self.quality == 0 {
            return Err(EncodeError::invalid_settings("quality must be at least 1"));
        }
        if self.output_file_name.is_empty() || self.output_file_name.contains(['/', '\\']) {
            return Err(EncodeError::invalid_settings(format!(
                "output file name must be a plain file name, got {:?}",
                self.output_file_name
            )));
        }
        Ok(())
    }

    /// Target bitrate in bits per second.
    pub fn bitrate(&self) -> u64 {
        u64::from(self.quality) * BITRATE_QUALITY_SCALE
    }

    /// Arguments placed before the input (hardware device setup).
    pub fn input_args(&self) -> Vec<String> {
        match self.kind {
            EncoderKind::Vaapi => vec!["-vaapi_device".to_string(), VAAPI_DEVICE.to_string()],
            _ => Vec::new(),
        }
    }

    /// Video filter chain: scale to the output size, then convert to the
    /// pixel format the encoder accepts.
    pub fn filter(&self) -> String {
        let scale = format!("scale={}:{}", self.width, self.height);
        match self.kind {
            EncoderKind::Vaapi => format!("{scale},format=nv12,hwupload"),
            EncoderKind::MediaCodec => format!("{scale},format=nv12"),
            EncoderKind::Nvenc | EncoderKind::Libx264 => format!("{scale},format=yuv420p"),
        }
    }

    /// Codec arguments placed after the filter chain.
    pub fn codec_args(&self) -> Vec<String> {
        let mut args = vec![
            "-c:v".to_string(),
            self.kind.codec_name().to_string(),
            "-b:v".to_string(),
            self.bitrate().to_string(),
        ];
        if self.kind == EncoderKind::Libx264 {
            args.extend(["-preset".to_string(), "medium".to_string()]);
        }
        args.extend(["-movflags".to_string(), "+faststart".to_string()]);
        args
    }
}
