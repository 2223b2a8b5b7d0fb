use thiserror::Error;

/// Errors from the media store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No blob with the requested hash.
    #[error("media blob not found: {0}")]
    NotFound(String),

    #[error("media storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller passed a malformed hex digest.
    #[error("invalid content hash: {0}")]
    InvalidHash(String),

    /// The upload outgrew the configured cap.
    #[error("media exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
