/// Errors that can occur within the storage layer.
///
/// # Examples
///
/// ```rust
/// use pulse_storage::error::StorageError;
///
/// let err = StorageError::Other("store closed".to_string());
/// assert!(err.to_string().contains("store closed"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An underlying SQLite error (constraint violations included).
    #[error("Storage: SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization or deserialization failure.
    #[error("Storage: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure while preparing the database location.
    #[error("Storage: IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic storage error for cases not covered by other variants.
    #[error("Storage: {0}")]
    Other(String),
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
