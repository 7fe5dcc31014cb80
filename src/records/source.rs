//! Line-oriented record sources

use crate::records::error::{RecordError, RecordResult};
use std::fs;
use std::path::Path;

/// A finite, line-oriented record source
///
/// Implementations hand the producer a fully materialised record sequence:
/// line terminators and surrounding whitespace stripped, blank lines
/// dropped. A missing source fails with [`RecordError::NotFound`].
pub trait LineSource: Send + Sync {
    fn read_lines(&self, path: &Path) -> RecordResult<Vec<String>>;
}

/// Filesystem-backed record source
#[derive(Debug, Default)]
pub struct FsLineSource;

impl LineSource for FsLineSource {
    fn read_lines(&self, path: &Path) -> RecordResult<Vec<String>> {
        if !path.exists() {
            return Err(RecordError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_lines_strips_and_drops_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "hello\n\n  world  \n\ntest\n").unwrap();

        let lines = FsLineSource.read_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["hello", "world", "test"]);
    }

    #[test]
    fn test_missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-file.txt");

        match FsLineSource.read_lines(&path) {
            Err(RecordError::NotFound { path: reported }) => {
                assert_eq!(reported, path);
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_empty_source_yields_no_records() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let lines = FsLineSource.read_lines(file.path()).unwrap();
        assert!(lines.is_empty());
    }
}
