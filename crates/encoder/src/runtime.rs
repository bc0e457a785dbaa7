//! Process-wide encoder runtime, initialized once before the first encode.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use crate::error::EncodeError;

static RUNTIME: OnceLock<EncoderRuntime> = OnceLock::new();

/// A located, working ffmpeg binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderRuntime {
    binary: PathBuf,
    version: String,
}

impl EncoderRuntime {
    /// Locate and probe ffmpeg, once per process.
    ///
    /// Later calls return the runtime from the first successful call and
    /// ignore `binary`. A failed probe is not cached, so a caller may retry
    /// after fixing the environment.
    pub fn initialize(binary: Option<&Path>) -> Result<&'static EncoderRuntime, EncodeError> {
        if let Some(runtime) = RUNTIME.get() {
            return Ok(runtime);
        }

        let binary = binary.unwrap_or_else(|| Path::new("ffmpeg"));
        let probed = Self::probe(binary)?;
        let runtime = RUNTIME.get_or_init(|| probed);
        tracing::info!(
            binary = %runtime.binary.display(),
            version = %runtime.version,
            "Encoder runtime initialized"
        );
        Ok(runtime)
    }

    /// The runtime, if [`EncoderRuntime::initialize`] has succeeded.
    pub fn get() -> Option<&'static EncoderRuntime> {
        RUNTIME.get()
    }

    /// Run `<binary> -version` and keep the first line of its output.
    pub fn probe(binary: &Path) -> Result<Self, EncodeError> {
        let output = Command::new(binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                EncodeError::runtime_unavailable(format!(
                    "failed to run {} (is ffmpeg installed and on PATH?): {e}",
                    binary.display()
                ))
            })?;

        if !output.status.success() {
            return Err(EncodeError::runtime_unavailable(format!(
                "{} -version exited with {}",
                binary.display(),
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = parse_version_line(&stdout).ok_or_else(|| {
            EncodeError::runtime_unavailable(format!(
                "{} did not report an ffmpeg version",
                binary.display()
            ))
        })?;

        Ok(Self {
            binary: binary.to_path_buf(),
            version,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(binary: impl Into<PathBuf>, version: &str) -> Self {
        Self {
            binary: binary.into(),
            version: version.to_string(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Extract the version token from `ffmpeg version N.N ...`.
fn parse_version_line(output: &str) -> Option<String> {
    let line = output.lines().next()?.trim();
    let rest = line.strip_prefix("ffmpeg version ")?;
    let version = rest.split_whitespace().next()?;
    Some(version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_line() {
        let out = "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023 the FFmpeg developers\nbuilt with gcc\n";
        assert_eq!(parse_version_line(out).as_deref(), Some("6.1.1-3ubuntu5"));
        assert_eq!(parse_version_line("avconv version 12"), None);
        assert_eq!(parse_version_line(""), None);
    }

    #[test]
    fn test_probe_missing_binary_is_unavailable() {
        let err = EncoderRuntime::probe(Path::new("/nonexistent/framestage/ffmpeg")).unwrap_err();
        assert!(matches!(err, EncodeError::RuntimeUnavailable { .. }));
    }
}
