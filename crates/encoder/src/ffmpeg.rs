//! ffmpeg-backed encoder.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EncodeError;
use crate::frames::{collect_frames, write_concat_list};
use crate::runtime::EncoderRuntime;
use crate::settings::EncodeSettings;
use crate::Encoder;

/// Record of a finished encode, written beside the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeSummary {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bitrate: u64,
    pub frames: usize,
    pub skipped_frames: usize,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
}

/// Encodes a staged directory by handing an ffconcat list to ffmpeg.
pub struct FfmpegEncoder {
    runtime: EncoderRuntime,
    settings: EncodeSettings,
    last_summary: Option<EncodeSummary>,
}

impl FfmpegEncoder {
    pub fn new(runtime: &EncoderRuntime, settings: EncodeSettings) -> Result<Self, EncodeError> {
        settings.validate()?;
        Ok(Self {
            runtime: runtime.clone(),
            settings,
            last_summary: None,
        })
    }

    pub fn settings(&self) -> &EncodeSettings {
        &self.settings
    }

    /// Summary of the most recent successful encode.
    pub fn last_summary(&self) -> Option<&EncodeSummary> {
        self.last_summary.as_ref()
    }

    /// Where the video for `staged_dir` will be written.
    pub fn output_path_for(&self, staged_dir: &Path) -> PathBuf {
        let parent = staged_dir.parent().unwrap_or(staged_dir);
        parent.join(&self.settings.output_file_name)
    }

    fn build_args(&self, list_path: &Path, output: &Path) -> Vec<String> {
        let mut args = vec!["-hide_banner".to_string(), "-y".to_string()];
        args.extend(self.settings.input_args());
        args.extend([
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            list_path.to_string_lossy().into_owned(),
            "-vf".to_string(),
            self.settings.filter(),
            "-r".to_string(),
            self.settings.fps.to_string(),
        ]);
        args.extend(self.settings.codec_args());
        args.push(output.to_string_lossy().into_owned());
        args
    }

    fn run_ffmpeg(&self, args: &[String]) -> Result<(), EncodeError> {
        tracing::debug!(args = ?args, "Running ffmpeg");
        let output = Command::new(self.runtime.binary())
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                EncodeError::runtime_unavailable(format!("Failed to start ffmpeg: {e}"))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncodeError::Failed {
                encoder: self.settings.kind.codec_name().to_string(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(&mut self, staged_dir: &Path) -> Result<PathBuf, EncodeError> {
        let started_at = Utc::now();
        let started = std::time::Instant::now();

        // The concat demuxer resolves relative entries against the list's
        // directory, not the working directory.
        let staged_dir = absolute_dir(staged_dir)?;
        let staged_dir = staged_dir.as_path();

        let frame_set = collect_frames(staged_dir)?;
        let output = self.output_path_for(staged_dir);
        let list_path = output.with_extension("frames.txt");
        write_concat_list(&list_path, &frame_set.frames, self.settings.fps)?;

        tracing::info!(
            input = %staged_dir.display(),
            output = %output.display(),
            frames = frame_set.frames.len(),
            skipped = frame_set.skipped.len(),
            codec = self.settings.kind.codec_name(),
            "Encoding staged frames"
        );

        let args = self.build_args(&list_path, &output);
        let result = self.run_ffmpeg(&args);
        if let Err(err) = std::fs::remove_file(&list_path) {
            tracing::debug!(error = %err, path = %list_path.display(), "Failed to remove frame list");
        }
        result?;

        let duration_ms = started.elapsed().as_millis();
        tracing::info!(
            output = %output.display(),
            frames = frame_set.frames.len(),
            duration_ms,
            "Encode finished"
        );

        let summary = EncodeSummary {
            input_dir: staged_dir.to_path_buf(),
            output: output.clone(),
            codec: self.settings.kind.codec_name().to_string(),
            width: self.settings.width,
            height: self.settings.height,
            fps: self.settings.fps,
            bitrate: self.settings.bitrate(),
            frames: frame_set.frames.len(),
            skipped_frames: frame_set.skipped.len(),
            started_at,
            duration_ms,
        };

        let summary_path = output.with_extension("encode.json");
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&summary_path, json) {
                    tracing::warn!(error = %err, path = %summary_path.display(), "Failed to write encode summary");
                }
            }
            Err(err) => tracing::warn!(error = %err, "Failed to serialize encode summary"),
        }

        self.last_summary = Some(summary);
        Ok(output)
    }

    fn is_available(&self) -> bool {
        EncoderRuntime::probe(self.runtime.binary()).is_ok()
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, EncodeError> {
    std::fs::canonicalize(dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EncodeError::InvalidInput {
                path: dir.to_path_buf(),
                message: "not a directory".to_string(),
            }
        } else {
            EncodeError::Io {
                path: dir.to_path_buf(),
                source: e,
            }
        }
    })
}
