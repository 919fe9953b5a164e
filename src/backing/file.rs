//! FileBackingStore - one JSON file per key on local disk.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::{BackingError, BackingStore};

/// File-based backing store rooted at a directory. Each key maps to
/// `{root}/{key}.json`; writes go to a sibling temp file first and are
/// renamed into place so a crash mid-write never truncates the document.
pub struct FileBackingStore {
    root: PathBuf,
}

impl FileBackingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

fn io_error(err: std::io::Error) -> BackingError {
    BackingError::Io(err.to_string())
}

#[async_trait]
impl BackingStore for FileBackingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BackingError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(err)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), BackingError> {
        fs::create_dir_all(&self.root).await.map_err(io_error)?;
        let path = self.path_for(key);
        let staging = self.root.join(format!("{key}.json.tmp"));
        fs::write(&staging, value.as_bytes()).await.map_err(io_error)?;
        fs::rename(&staging, &path).await.map_err(io_error)?;
        Ok(())
    }
}
