//! Pending-collection record stores
//!
//! - `InMemoryRecordStore`: process-local, for tests and embedding
//! - `FileRecordStore`: one file on disk, replaced atomically

use crate::domain::errors::StoreError;
use crate::ports::outbound::CollectionRecordStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Record store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    record: Mutex<Option<Vec<u8>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_record(&self) -> bool {
        self.record.lock().is_some()
    }
}

#[async_trait]
impl CollectionRecordStore for InMemoryRecordStore {
    async fn put_record(&self, record: Vec<u8>) -> Result<(), StoreError> {
        *self.record.lock() = Some(record);
        Ok(())
    }

    async fn load_record(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.record.lock().clone())
    }

    async fn clear_record(&self) -> Result<(), StoreError> {
        self.record.lock().take();
        Ok(())
    }
}

/// Record store backed by a single file.
///
/// Writes go to `<path>.tmp`, are synced, and only then renamed over
/// `<path>`, so a crash mid-write leaves either the old record or the new
/// one. A failed write removes the temp file and keeps the old record.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|dir| !dir.as_os_str().is_empty())
    }

    /// Make the rename itself durable.
    #[cfg(unix)]
    async fn sync_parent_dir(&self) -> Result<(), StoreError> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        tokio::fs::File::open(dir).await?.sync_all().await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn sync_parent_dir(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

#[async_trait]
impl CollectionRecordStore for FileRecordStore {
    async fn put_record(&self, record: Vec<u8>) -> Result<(), StoreError> {
        if let Some(parent) = self.parent_dir() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        if let Err(err) = write_synced(&temp, &record).await {
            warn!(
                path = %temp.display(),
                error = %err,
                "[lineage-gc] Record write failed, discarding temp file"
            );
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(err);
        }
        tokio::fs::rename(&temp, &self.path).await?;
        self.sync_parent_dir().await?;

        info!(
            path = %self.path.display(),
            bytes = record.len(),
            "[lineage-gc] 💾 Pending collection record written"
        );
        Ok(())
    }

    async fn load_record(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "[lineage-gc] Record loaded");
                Ok(Some(bytes))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn clear_record(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
