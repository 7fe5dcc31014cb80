//! Buffer Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Buffer is full (capacity: {capacity})")]
    Full { capacity: usize },

    #[error("Buffer is empty")]
    Empty,

    #[error("Buffer capacity must be greater than zero (requested: {requested})")]
    InvalidCapacity { requested: usize },
}

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;
