//! JSON file key-value store.
//!
//! All values live in one JSON object on disk. Every write rewrites the
//! whole object through a sibling temp file followed by a rename, so a
//! crash mid-write leaves either the old or the new document.

use crate::error::{Result, SessionError};
use crate::providers::KeyValueStore;
use std::collections::BTreeMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

type Document = BTreeMap<String, String>;

/// Durable key-value store backed by a JSON file.
///
/// Clones share a write lock, so read-modify-write cycles from one process
/// never interleave.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    /// Create a store persisted at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document> {
        match tokio::fs::read(self.path.as_path()).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                SessionError::Storage(format!("corrupt store {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(io_error("read", &self.path, &e)),
        }
    }

    async fn persist(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory for", &self.path, &e))?;
        }

        let mut temp = self.path.as_os_str().to_owned();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| SessionError::Storage(e.to_string()))?;

        tokio::fs::write(&temp, bytes)
            .await
            .map_err(|e| io_error("write", &temp, &e))?;
        tokio::fs::rename(&temp, self.path.as_path())
            .await
            .map_err(|e| io_error("replace", &self.path, &e))?;

        tracing::trace!(path = %self.path.display(), entries = document.len(), "Persisted key-value store");
        Ok(())
    }

    async fn update(&self, change: impl FnOnce(&mut Document) + Send) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        change(&mut document);
        self.persist(&document).await
    }
}

fn io_error(operation: &str, path: &Path, error: &std::io::Error) -> SessionError {
    SessionError::Storage(format!("failed to {operation} {}: {error}", path.display()))
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        async move { Ok(self.load().await?.remove(key)) }
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.update(|document| {
                document.insert(key.to_string(), value.to_string());
            })
            .await
        }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.update(|document| {
                document.remove(key);
            })
            .await
        }
    }

    fn keys(&self) -> impl Future<Output = Result<Vec<String>>> + Send {
        async move { Ok(self.load().await?.into_keys().collect()) }
    }

    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        async move { self.update(Document::clear).await }
    }
}
