//! Pipeline Error Types

use crate::buffer::BufferError;
use crate::records::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{name} is already running")]
    AlreadyRunning { name: String },

    #[error("Workers cannot be registered once the pipeline has started")]
    RegistrationClosed,

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Synchronisation error: {message}")]
    Sync { message: String },
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
