//! Frame discovery inside a staged directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::EncodeError;

const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

/// Frames found in a staged directory, in encode order.
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    pub frames: Vec<PathBuf>,
    /// Image files left out because they were empty.
    pub skipped: Vec<PathBuf>,
}

/// Whether `path` has an image extension the encoder accepts.
pub fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Collect image files directly in `dir`, sorted by file name.
///
/// Zero-length images cannot be decoded, so they are skipped with a warning
/// rather than failing the whole encode.
pub fn collect_frames(dir: &Path) -> Result<FrameSet, EncodeError> {
    if !dir.is_dir() {
        return Err(EncodeError::InvalidInput {
            path: dir.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let io_err = |e: std::io::Error| EncodeError::Io {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if entry.file_type().map_err(io_err)?.is_file() && is_frame_file(&path) {
            candidates.push(path);
        }
    }
    candidates.sort();

    let mut set = FrameSet::default();
    for path in candidates {
        if frame_len(&path)? == 0 {
            tracing::warn!(frame = %path.display(), "Skipping empty frame");
            set.skipped.push(path);
        } else {
            set.frames.push(path);
        }
    }

    if set.frames.is_empty() {
        return Err(EncodeError::NoFrames {
            path: dir.to_path_buf(),
        });
    }
    Ok(set)
}

fn frame_len(path: &Path) -> Result<u64, EncodeError> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| EncodeError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Write an ffmpeg concat-demuxer list showing each frame for `1/fps` seconds.
pub fn write_concat_list(list_path: &Path, frames: &[PathBuf], fps: u32) -> Result<(), EncodeError> {
    let io_err = |e: std::io::Error| EncodeError::Io {
        path: list_path.to_path_buf(),
        source: e,
    };

    let mut out = std::io::BufWriter::new(std::fs::File::create(list_path).map_err(io_err)?);
    let duration = 1.0 / f64::from(fps.max(1));

    writeln!(out, "ffconcat version 1.0").map_err(io_err)?;
    for frame in frames {
        writeln!(out, "file {}", quote_concat_path(frame)).map_err(io_err)?;
        writeln!(out, "duration {duration:.6}").map_err(io_err)?;
    }
    // The concat demuxer ignores the duration of the final entry unless the
    // file is listed once more.
    if let Some(last) = frames.last() {
        writeln!(out, "file {}", quote_concat_path(last)).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    Ok(())
}

fn quote_concat_path(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_frame_file_is_case_insensitive() {
        assert!(is_frame_file(Path::new("00001-capture.JPG")));
        assert!(is_frame_file(Path::new("a.png")));
        assert!(!is_frame_file(Path::new("notes.txt")));
        assert!(!is_frame_file(Path::new("jpg")));
    }

    #[test]
    fn test_collect_frames_sorts_and_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("00002-capture.jpg"), b"b").unwrap();
        std::fs::write(dir.path().join("00001-capture.jpg"), b"a").unwrap();
        std::fs::write(dir.path().join("00003-capture.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();

        let set = collect_frames(dir.path()).unwrap();
        let names: Vec<_> = set
            .frames
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["00001-capture.jpg", "00002-capture.jpg"]);
        assert_eq!(set.skipped.len(), 1);
    }

    #[test]
    fn test_unreadable_frame_metadata_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = frame_len(&dir.path().join("vanished.jpg")).unwrap_err();
        assert!(matches!(err, EncodeError::Io { .. }));
    }

    #[test]
    fn test_collect_frames_without_images_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.png"), b"").unwrap();
        assert!(matches!(
            collect_frames(dir.path()),
            Err(EncodeError::NoFrames { .. })
        ));
    }

    #[test]
    fn test_concat_list_repeats_last_frame_and_escapes_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("frames.txt");
        let frames = vec![PathBuf::from("/s/a.jpg"), PathBuf::from("/s/it's.jpg")];

        write_concat_list(&list, &frames, 10).unwrap();

        let content = std::fs::read_to_string(&list).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "ffconcat version 1.0");
        assert_eq!(lines[1], "file '/s/a.jpg'");
        assert_eq!(lines[2], "duration 0.100000");
        assert_eq!(lines[3], r"file '/s/it'\''s.jpg'");
        assert_eq!(lines.last(), Some(&r"file '/s/it'\''s.jpg'"));
        assert_eq!(lines.len(), 6);
    }
}
