//! Content-addressed storage for uploaded media.
//!
//! Submission photos and videos are stored by SHA-256 digest so duplicate
//! uploads share bytes on disk. The database only records metadata
//! (`entity::media_object`); this module owns the bytes.

mod error;
mod filesystem;
mod hash;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

pub use error::StorageError;
pub use filesystem::FilesystemMediaStore;
pub use hash::ContentHash;

/// Boxed async reader handed between the upload handler and the store.
pub type MediaReader = Box<dyn AsyncRead + Unpin + Send>;

/// Storage seam for uploaded media bytes.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Consume a reader, persist its bytes, and return their content hash.
    /// Fails with `SizeLimitExceeded` when the stream outgrows the store's cap.
    async fn store(&self, reader: MediaReader) -> Result<ContentHash, StorageError>;

    /// Open a stored blob for streaming reads.
    async fn open(&self, hash: &ContentHash) -> Result<MediaReader, StorageError>;

    /// Whether a blob with this hash exists.
    async fn contains(&self, hash: &ContentHash) -> Result<bool, StorageError>;

    /// Size of a stored blob in bytes.
    async fn len(&self, hash: &ContentHash) -> Result<u64, StorageError>;

    /// Remove a blob. Returns `false` if it was not present.
    async fn remove(&self, hash: &ContentHash) -> Result<bool, StorageError>;

    /// Convenience: persist an in-memory buffer.
    async fn store_bytes(&self, data: &[u8]) -> Result<ContentHash, StorageError> {
        let reader: MediaReader = Box::new(std::io::Cursor::new(data.to_vec()));
        self.store(reader).await
    }

    /// Convenience: read a whole blob into memory.
    async fn read_bytes(&self, hash: &ContentHash) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.open(hash).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}
