//! Per-entry outcomes and the batch report.

use std::path::{Path, PathBuf};

use framestage_asset_bundle::AssetRef;
use serde::Serialize;

/// Result of staging a single asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CopyOutcome {
    /// Bytes written to the destination (zero for an empty asset).
    Copied { bytes: u64 },
    /// The entry was deliberately not copied.
    Skipped { reason: String },
    /// The copy was attempted and failed.
    Failed { reason: String },
}

impl CopyOutcome {
    pub fn is_copied(&self) -> bool {
        matches!(self, Self::Copied { .. })
    }
}

/// One line of a [`StagingReport`].
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub asset: AssetRef,
    pub destination: PathBuf,
    pub outcome: CopyOutcome,
}

/// Outcome of staging a whole source root, in enumeration order.
#[derive(Debug, Clone, Serialize)]
pub struct StagingReport {
    target_dir: PathBuf,
    entries: Vec<EntryReport>,
}

impl StagingReport {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, asset: AssetRef, destination: PathBuf, outcome: CopyOutcome) {
        self.entries.push(EntryReport {
            asset,
            destination,
            outcome,
        });
    }

    /// Directory the batch was staged into.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn entries(&self) -> &[EntryReport] {
        &self.entries
    }

    pub fn copied(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_copied()).count()
    }

    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, CopyOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, CopyOutcome::Failed { .. }))
            .count()
    }

    /// Total bytes written across all copied entries.
    pub fn bytes_copied(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| match e.outcome {
                CopyOutcome::Copied { bytes } => bytes,
                _ => 0,
            })
            .sum()
    }

    /// Destination files that were written successfully.
    pub fn staged_files(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_copied())
            .map(|e| e.destination.as_path())
    }

    /// Entries that failed, with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&AssetRef, &str)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            CopyOutcome::Failed { reason } => Some((&e.asset, reason.as_str())),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> StagingReport {
        let mut report = StagingReport::new("/s/images");
        report.push(
            AssetRef::new("images", "a.png"),
            PathBuf::from("/s/images/a.png"),
            CopyOutcome::Copied { bytes: 100 },
        );
        report.push(
            AssetRef::new("images", "b.png"),
            PathBuf::from("/s/images/b.png"),
            CopyOutcome::Copied { bytes: 0 },
        );
        report.push(
            AssetRef::new("images", "c.png"),
            PathBuf::from("/s/images/c.png"),
            CopyOutcome::Failed {
                reason: "Cannot read images/c.png".to_string(),
            },
        );
        report.push(
            AssetRef::new("images", "thumbs"),
            PathBuf::from("/s/images/thumbs"),
            CopyOutcome::Skipped {
                reason: "nested directory".to_string(),
            },
        );
        report
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.copied(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.bytes_copied(), 100);
        assert!(report.has_failures());
    }

    #[test]
    fn test_staged_files_and_failures() {
        let report = report();
        let staged: Vec<&Path> = report.staged_files().collect();
        assert_eq!(
            staged,
            vec![Path::new("/s/images/a.png"), Path::new("/s/images/b.png")]
        );
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.name(), "c.png");
    }

    #[test]
    fn test_json_tags_outcomes() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["entries"][0]["outcome"]["status"], "copied");
        assert_eq!(json["entries"][0]["outcome"]["bytes"], 100);
        assert_eq!(json["entries"][2]["outcome"]["status"], "failed");
        assert_eq!(json["entries"][3]["outcome"]["status"], "skipped");
    }
}
