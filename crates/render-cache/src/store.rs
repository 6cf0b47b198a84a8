//! File-based artifact storage
//!
//! A direct façade over the cache directory. No locking or buffering happens
//! here; callers pair every removal of a tracked file with a registry update.

use crate::error::{CacheError, Result};
use crate::key::ArtifactKey;
use crate::types::ArtifactPair;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

const INPUT_EXTENSION: &str = "html";
const OUTPUT_EXTENSION: &str = "pdf";

/// Directory holding `<key>.html` / `<key>.pdf` artifact pairs
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    cache_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Ensure the cache directory exists
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| CacheError::io("create", &self.cache_dir, e))?;
        info!(cache_dir = ?self.cache_dir, "Artifact store initialized");
        Ok(())
    }

    /// Paths for the input and output artifacts named by `key`
    pub fn pair(&self, key: &ArtifactKey) -> ArtifactPair {
        ArtifactPair {
            key: key.to_string(),
            input: self
                .cache_dir
                .join(format!("{}.{}", key, INPUT_EXTENSION)),
            output: self
                .cache_dir
                .join(format!("{}.{}", key, OUTPUT_EXTENSION)),
        }
    }

    pub async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::write(path, data)
            .await
            .map_err(|e| CacheError::io("write", path, e))
    }

    pub async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
            .await
            .map_err(|e| CacheError::io("read", path, e))
    }

    /// Remove an artifact. Returns `false` when the file was already gone,
    /// which is not an error.
    pub async fn remove(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::io("remove", path, e)),
        }
    }
}
