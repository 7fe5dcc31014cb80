//! Record Collaborator Error Types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Source not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for record source/sink operations
pub type RecordResult<T> = Result<T, RecordError>;
