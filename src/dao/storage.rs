use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of how the document is held.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A stored node does not decode into, or a value does not encode to, the document shape.
    #[error("stored document at `{path}` is malformed")]
    Corrupted {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct a codec error for the node at `path`.
    pub fn corrupted(path: impl Into<String>, source: serde_json::Error) -> Self {
        StorageError::Corrupted {
            path: path.into(),
            source,
        }
    }
}
