use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::hash::ContentHash;
use super::{MediaReader, MediaStore};

const READ_BUF_SIZE: usize = 32 * 1024;

/// Filesystem-backed media store.
///
/// Layout is sharded by the first hash byte to keep directories small:
/// `{root}/{2 hex chars}/{62 hex chars}`. Writes go through a staging file and
/// are renamed into place, so a crash mid-upload never leaves a partial blob
/// under its final name.
pub struct FilesystemMediaStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemMediaStore {
    pub async fn open_dir(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(root.join("staging")).await?;
        Ok(Self { root, max_size })
    }

    fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        self.root.join(hash.shard()).join(hash.rest())
    }

    fn staging_path(&self) -> PathBuf {
        self.root
            .join("staging")
            .join(uuid::Uuid::new_v4().to_string())
    }

    async fn commit(&self, staged: &PathBuf, hash: &ContentHash) -> Result<(), StorageError> {
        let target = self.blob_path(hash);
        if target.exists() {
            // Identical content is already stored.
            let _ = fs::remove_file(staged).await;
            return Ok(());
        }
        if let Some(shard_dir) = target.parent() {
            fs::create_dir_all(shard_dir).await?;
        }
        if let Err(e) = fs::rename(staged, &target).await {
            let _ = fs::remove_file(staged).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn store(&self, mut reader: MediaReader) -> Result<ContentHash, StorageError> {
        let staged = self.staging_path();
        let mut file = fs::File::create(&staged).await?;
        let mut hasher = Sha256::new();
        let mut written: u64 = 0;
        let mut buf = vec![0u8; READ_BUF_SIZE];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    drop(file);
                    let _ = fs::remove_file(&staged).await;
                    return Err(e.into());
                }
            };

            written += n as u64;
            if written > self.max_size {
                drop(file);
                let _ = fs::remove_file(&staged).await;
                return Err(StorageError::SizeLimitExceeded {
                    actual: written,
                    limit: self.max_size,
                });
            }

            hasher.update(&buf[..n]);
            if let Err(e) = file.write_all(&buf[..n]).await {
                drop(file);
                let _ = fs::remove_file(&staged).await;
                return Err(e.into());
            }
        }

        file.flush().await?;
        drop(file);

        let hash = ContentHash::from_raw(hasher.finalize().into());
        self.commit(&staged, &hash).await?;
        Ok(hash)
    }

    async fn open(&self, hash: &ContentHash) -> Result<MediaReader, StorageError> {
        match fs::File::open(self.blob_path(hash)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(hash.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn contains(&self, hash: &ContentHash) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.blob_path(hash)).await?)
    }

    async fn len(&self, hash: &ContentHash) -> Result<u64, StorageError> {
        match fs::metadata(self.blob_path(hash)).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(hash.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, hash: &ContentHash) -> Result<bool, StorageError> {
        match fs::remove_file(self.blob_path(hash)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
