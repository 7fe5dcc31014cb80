//! Line-oriented record sinks

use crate::records::error::{RecordError, RecordResult};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// An append-only, line-oriented record sink
///
/// `append_line` creates parent directories idempotently; `truncate` resets
/// the sink so a re-run starts from fresh output rather than appending
/// duplicates.
pub trait LineSink: Send + Sync {
    fn append_line(&self, path: &Path, line: &str) -> RecordResult<()>;
    fn truncate(&self, path: &Path) -> RecordResult<()>;
}

/// Filesystem-backed record sink
#[derive(Debug, Default)]
pub struct FsLineSink;

impl FsLineSink {
    fn ensure_parent(path: &Path) -> RecordResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| RecordError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

impl LineSink for FsLineSink {
    fn append_line(&self, path: &Path, line: &str) -> RecordResult<()> {
        Self::ensure_parent(path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| RecordError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        writeln!(file, "{}", line).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn truncate(&self, path: &Path) -> RecordResult<()> {
        if path.exists() {
            fs::remove_file(path).map_err(|source| RecordError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("sink.txt");

        FsLineSink.append_line(&path, "HELLO").unwrap();
        FsLineSink.append_line(&path, "WORLD").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "HELLO\nWORLD\n");
    }

    #[test]
    fn test_truncate_clears_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sink.txt");

        FsLineSink.append_line(&path, "stale").unwrap();
        FsLineSink.truncate(&path).unwrap();
        FsLineSink.append_line(&path, "fresh").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "fresh\n");
    }

    #[test]
    fn test_truncate_on_missing_sink_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-written.txt");

        assert!(FsLineSink.truncate(&path).is_ok());
    }
}
