//! Staging copier: bundle entries to files in the staging directory.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use framestage_asset_bundle::{enumerate, AssetBundle, AssetRef};

use crate::error::{CopyError, StagingError};
use crate::layout::validate_component;
use crate::report::{CopyOutcome, StagingReport};

/// Copy buffer size. Any value >= 1 is correct; it only affects throughput.
pub const COPY_BUFFER_SIZE: usize = 1024;

/// Copy `reader` to `writer` through `buffer` until end of input.
///
/// Returns the number of bytes copied. `Interrupted` reads are retried.
pub fn copy_stream<R, W>(reader: &mut R, writer: &mut W, buffer: &mut [u8]) -> std::io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut copied = 0u64;
    loop {
        let read = match reader.read(buffer) {
            Ok(0) => return Ok(copied),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..read])?;
        copied += read as u64;
    }
}

/// Destination directory for a batch, created lazily on first use.
#[derive(Debug, Clone)]
pub struct StagingTarget {
    dir: PathBuf,
    ensured: bool,
}

impl StagingTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ensured: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory (and parents) if it is missing.
    ///
    /// An existing directory is left as is, including any unrelated files.
    pub fn ensure(&mut self) -> Result<(), StagingError> {
        if self.ensured {
            return Ok(());
        }

        if self.dir.is_dir() {
            tracing::debug!(dir = %self.dir.display(), "Staging directory already exists");
        } else if self.dir.exists() {
            return Err(StagingError::NotADirectory {
                path: self.dir.clone(),
            });
        } else {
            std::fs::create_dir_all(&self.dir).map_err(|e| StagingError::DirectoryCreation {
                path: self.dir.clone(),
                source: e,
            })?;
            tracing::debug!(dir = %self.dir.display(), "Created staging directory");
        }

        self.ensured = true;
        Ok(())
    }

    /// `<dir>/<name>` for a validated entry name.
    pub fn destination_for(&self, name: &str) -> Result<PathBuf, String> {
        validate_component(name)?;
        Ok(self.dir.join(name))
    }
}

/// Copies assets out of a bundle, one entry at a time.
pub struct StagingCopier<'a> {
    bundle: &'a dyn AssetBundle,
    buffer_size: usize,
}

impl<'a> StagingCopier<'a> {
    pub fn new(bundle: &'a dyn AssetBundle) -> Self {
        Self {
            bundle,
            buffer_size: COPY_BUFFER_SIZE,
        }
    }

    /// Override the copy buffer size (clamped to at least one byte).
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Enumerate `root` and stage every entry into `target`.
    pub fn stage_root(
        &self,
        root: &str,
        target: &mut StagingTarget,
    ) -> Result<StagingReport, StagingError> {
        let assets = enumerate(self.bundle, root);
        self.stage_all(&assets, target)
    }

    /// Stage `assets` into `target` in order.
    ///
    /// Fails only when the target directory cannot be prepared, in which case
    /// nothing is copied. Every other problem is recorded in the report and
    /// the remaining entries are still attempted.
    pub fn stage_all(
        &self,
        assets: &[AssetRef],
        target: &mut StagingTarget,
    ) -> Result<StagingReport, StagingError> {
        target.ensure()?;

        let mut report = StagingReport::new(target.dir());
        let mut buffer = vec![0u8; self.buffer_size];

        for asset in assets {
            let destination = match target.destination_for(asset.name()) {
                Ok(path) => path,
                Err(reason) => {
                    tracing::warn!(asset = %asset, reason = %reason, "Skipping asset with unusable name");
                    report.push(
                        asset.clone(),
                        target.dir().to_path_buf(),
                        CopyOutcome::Skipped { reason },
                    );
                    continue;
                }
            };

            if self.bundle.is_dir(asset) {
                tracing::debug!(asset = %asset, "Skipping nested directory");
                report.push(
                    asset.clone(),
                    destination,
                    CopyOutcome::Skipped {
                        reason: "nested directory".to_string(),
                    },
                );
                continue;
            }

            let outcome = match self.copy_entry(asset, &destination, &mut buffer) {
                Ok(bytes) => {
                    tracing::debug!(asset = %asset, bytes, dest = %destination.display(), "Staged asset");
                    CopyOutcome::Copied { bytes }
                }
                Err(e) => {
                    tracing::error!(asset = %asset, error = %e, "Failed to stage asset");
                    CopyOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            report.push(asset.clone(), destination, outcome);
        }

        tracing::info!(
            dir = %report.target_dir().display(),
            copied = report.copied(),
            skipped = report.skipped(),
            failed = report.failed(),
            bytes = report.bytes_copied(),
            "Staging finished"
        );
        Ok(report)
    }

    /// Stage a single asset to an exact file path.
    ///
    /// Any file already at `destination` is removed first. Missing parent
    /// directories are created.
    pub fn stage_file(&self, asset: &AssetRef, destination: &Path) -> Result<u64, StagingError> {
        if destination.is_dir() {
            return Err(StagingError::Copy(CopyError::Destination {
                path: destination.to_path_buf(),
                source: std::io::Error::other("destination is a directory"),
            }));
        }

        if destination.exists() {
            std::fs::remove_file(destination).map_err(|e| StagingError::RemoveExisting {
                path: destination.to_path_buf(),
                source: e,
            })?;
        }

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            StagingTarget::new(parent).ensure()?;
        }

        let mut buffer = vec![0u8; self.buffer_size];
        let bytes = self.copy_entry(asset, destination, &mut buffer)?;
        tracing::info!(asset = %asset, bytes, dest = %destination.display(), "Staged asset");
        Ok(bytes)
    }

    /// Both streams live only inside this call, so they are closed on every
    /// return path, including a copy that fails partway.
    fn copy_entry(
        &self,
        asset: &AssetRef,
        destination: &Path,
        buffer: &mut [u8],
    ) -> Result<u64, CopyError> {
        let mut reader = self.bundle.open(asset).map_err(|e| CopyError::Source {
            asset: asset.source_path(),
            source: e,
        })?;

        let mut writer = open_truncated(destination).map_err(|e| CopyError::Destination {
            path: destination.to_path_buf(),
            source: e,
        })?;

        let bytes = copy_stream(&mut reader, &mut writer, buffer)
            .and_then(|bytes| writer.flush().map(|_| bytes))
            .map_err(|e| CopyError::Interrupted {
                asset: asset.source_path(),
                path: destination.to_path_buf(),
                source: e,
            })?;

        Ok(bytes)
    }
}

fn open_truncated(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
