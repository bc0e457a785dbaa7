//! Framestage Pipeline
//!
//! Stages a bundle root and then hands the staged directory to an encoder:
//!
//! ```text
//! StorageLayout ─► StagingTarget ─► StagingCopier::stage_root ─► report
//!                                                                  │
//!                                           encoder.encode(staging_dir)
//! ```
//!
//! Staging either fails as a whole (the directory could not be prepared) or
//! yields a report; per-entry failures never stop the encoder call. Staged
//! files are left in place whatever the encoder does.

use std::path::{Path, PathBuf};

use framestage_asset_bundle::AssetBundle;
use framestage_common::AppConfig;
use framestage_encoder::{EncodeError, Encoder};
use framestage_staging::{StagingCopier, StagingError, StagingReport, StagingTarget, StorageLayout};

/// Pipeline failures.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("Encoder {encoder} is not available")]
    EncoderUnavailable { encoder: String },

    #[error("Encoding {staged_dir} failed: {source}")]
    Encode {
        staged_dir: PathBuf,
        report: Box<StagingReport>,
        #[source]
        source: EncodeError,
    },
}

/// Result of a full stage-then-encode run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub report: StagingReport,
    pub video: PathBuf,
}

/// Stage-then-encode over one bundle root.
pub struct Pipeline<'a> {
    bundle: &'a dyn AssetBundle,
    layout: StorageLayout,
    source_root: String,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        bundle: &'a dyn AssetBundle,
        layout: StorageLayout,
        source_root: impl Into<String>,
    ) -> Self {
        Self {
            bundle,
            layout,
            source_root: source_root.into(),
        }
    }

    /// Build a pipeline from the storage and bundle configuration sections.
    pub fn from_config(bundle: &'a dyn AssetBundle, config: &AppConfig) -> Result<Self, StagingError> {
        let layout = StorageLayout::resolve(&config.storage)?;
        Ok(Self::new(bundle, layout, config.bundle.source_root.clone()))
    }

    /// Stage a different bundle root.
    pub fn with_source_root(mut self, source_root: impl Into<String>) -> Self {
        self.source_root = source_root.into();
        self
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.layout.staging_dir()
    }

    /// Stage the source root without encoding.
    pub fn stage(&self) -> Result<StagingReport, StagingError> {
        let mut target = StagingTarget::new(self.staging_dir());
        tracing::info!(
            bundle = %self.bundle.describe(),
            root = %self.source_root,
            dir = %target.dir().display(),
            "Staging bundle root"
        );
        StagingCopier::new(self.bundle).stage_root(&self.source_root, &mut target)
    }

    /// Stage the source root, then encode the staged directory.
    pub fn run(&self, encoder: &mut dyn Encoder) -> Result<PipelineOutcome, PipelineError> {
        if !encoder.is_available() {
            return Err(PipelineError::EncoderUnavailable {
                encoder: encoder.name().to_string(),
            });
        }

        let report = self.stage()?;
        if report.has_failures() {
            tracing::warn!(
                failed = report.failed(),
                "Some assets failed to stage, encoding the rest"
            );
        }

        let staged_dir = report.target_dir().to_path_buf();
        tracing::info!(encoder = encoder.name(), dir = %staged_dir.display(), "Invoking encoder");
        match encoder.encode(&staged_dir) {
            Ok(video) => {
                tracing::info!(video = %video.display(), "Pipeline finished");
                Ok(PipelineOutcome { report, video })
            }
            Err(source) => {
                tracing::error!(error = %source, dir = %staged_dir.display(), "Encoding failed, staged files kept");
                Err(PipelineError::Encode {
                    staged_dir,
                    report: Box::new(report),
                    source,
                })
            }
        }
    }
}

/// Encode an already-staged directory.
pub fn encode_dir(encoder: &mut dyn Encoder, dir: &Path) -> Result<PathBuf, PipelineError> {
    if !encoder.is_available() {
        return Err(PipelineError::EncoderUnavailable {
            encoder: encoder.name().to_string(),
        });
    }
    encoder.encode(dir).map_err(|source| PipelineError::Encode {
        staged_dir: dir.to_path_buf(),
        report: Box::new(StagingReport::new(dir)),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use framestage_asset_bundle::MemoryBundle;

    #[derive(Default)]
    struct RecordingEncoder {
        calls: Vec<PathBuf>,
        fail: bool,
        unavailable: bool,
    }

    impl Encoder for RecordingEncoder {
        fn encode(&mut self, staged_dir: &Path) -> Result<PathBuf, EncodeError> {
            self.calls.push(staged_dir.to_path_buf());
            if self.fail {
                return Err(EncodeError::Failed {
                    encoder: "recording".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "boom".to_string(),
                });
            }
            Ok(staged_dir.with_file_name("output.mp4"))
        }

        fn is_available(&self) -> bool {
            !self.unavailable
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn example_bundle() -> MemoryBundle {
        MemoryBundle::new()
            .with("images/a.png", vec![7u8; 100])
            .with("images/b.png", Vec::new())
    }

    #[test]
    fn test_run_stages_then_encodes_staging_dir() {
        let storage = tempfile::tempdir().unwrap();
        let bundle = example_bundle();
        let layout = StorageLayout::new(storage.path(), "Download", "images").unwrap();
        let pipeline = Pipeline::new(&bundle, layout, "images");

        let mut encoder = RecordingEncoder::default();
        let outcome = pipeline.run(&mut encoder).unwrap();

        let staged = storage.path().join("Download").join("images");
        assert_eq!(encoder.calls, vec![staged.clone()]);
        assert_eq!(outcome.report.copied(), 2);
        assert_eq!(outcome.video, storage.path().join("Download").join("output.mp4"));
        assert_eq!(std::fs::metadata(staged.join("a.png")).unwrap().len(), 100);
        assert_eq!(std::fs::metadata(staged.join("b.png")).unwrap().len(), 0);
    }

    #[test]
    fn test_encode_failure_keeps_staged_files() {
        let storage = tempfile::tempdir().unwrap();
        let bundle = example_bundle();
        let layout = StorageLayout::new(storage.path(), "Download", "images").unwrap();
        let pipeline = Pipeline::new(&bundle, layout, "images");

        let mut encoder = RecordingEncoder {
            fail: true,
            ..RecordingEncoder::default()
        };
        let err = pipeline.run(&mut encoder).unwrap_err();

        match err {
            PipelineError::Encode { report, source, .. } => {
                assert_eq!(report.copied(), 2);
                assert!(matches!(source, EncodeError::Failed { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(pipeline.staging_dir().join("a.png").is_file());
    }

    #[test]
    fn test_directory_failure_skips_encoder() {
        let storage = tempfile::tempdir().unwrap();
        // A file where the public subdirectory should be.
        std::fs::write(storage.path().join("Download"), b"not a dir").unwrap();

        let bundle = example_bundle();
        let layout = StorageLayout::new(storage.path(), "Download", "images").unwrap();
        let pipeline = Pipeline::new(&bundle, layout, "images");

        let mut encoder = RecordingEncoder::default();
        let err = pipeline.run(&mut encoder).unwrap_err();
        assert!(matches!(err, PipelineError::Staging(_)));
        assert!(encoder.calls.is_empty());
    }

    #[test]
    fn test_unavailable_encoder_stages_nothing() {
        let storage = tempfile::tempdir().unwrap();
        let bundle = example_bundle();
        let layout = StorageLayout::new(storage.path(), "Download", "images").unwrap();
        let pipeline = Pipeline::new(&bundle, layout, "images");

        let mut encoder = RecordingEncoder {
            unavailable: true,
            ..RecordingEncoder::default()
        };
        let err = pipeline.run(&mut encoder).unwrap_err();
        assert!(matches!(err, PipelineError::EncoderUnavailable { .. }));
        assert!(!pipeline.staging_dir().exists());
    }

    #[test]
    fn test_from_config_without_external_root_fails() {
        let bundle = example_bundle();
        let mut config = AppConfig::default();
        config.storage.external_root = None;
        config.storage.fallback_to_internal = false;

        assert!(matches!(
            Pipeline::from_config(&bundle, &config),
            Err(StagingError::StorageUnavailable { .. })
        ));

        config.storage.fallback_to_internal = true;
        let pipeline = Pipeline::from_config(&bundle, &config).unwrap();
        assert!(pipeline.staging_dir().starts_with(&config.storage.internal_root));
    }

    #[test]
    fn test_encode_dir_wraps_failure() {
        let mut encoder = RecordingEncoder {
            fail: true,
            ..RecordingEncoder::default()
        };
        let err = encode_dir(&mut encoder, Path::new("/tmp/staged")).unwrap_err();
        assert!(err.to_string().contains("/tmp/staged"));
        assert_eq!(encoder.calls.len(), 1);
    }
}
