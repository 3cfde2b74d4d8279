//! Key-value store with injectable failures.

use crate::error::{Result, SessionError};
use crate::providers::KeyValueStore;
use crate::stores::MemoryKeyValueStore;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory key-value store whose reads or writes can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct MockKeyValueStore {
    store: MemoryKeyValueStore,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockKeyValueStore {
    /// Create an empty store where everything succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle read failures.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Toggle write failures (`set`, `remove`, `clear`).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The backing store, bypassing failure injection.
    #[must_use]
    pub const fn inner(&self) -> &MemoryKeyValueStore {
        &self.store
    }

    fn check(flag: &AtomicBool, operation: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(SessionError::Storage(format!("injected {operation} failure")))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MockKeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        let this = self.clone();
        let key = key.to_string();

        async move {
            Self::check(&this.fail_reads, "read")?;
            this.store.get(&key).await
        }
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();
        let key = key.to_string();
        let value = value.to_string();

        async move {
            Self::check(&this.fail_writes, "write")?;
            this.store.set(&key, &value).await
        }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();
        let key = key.to_string();

        async move {
            Self::check(&this.fail_writes, "write")?;
            this.store.remove(&key).await
        }
    }

    fn keys(&self) -> impl Future<Output = Result<Vec<String>>> + Send {
        let this = self.clone();

        async move {
            Self::check(&this.fail_reads, "read")?;
            this.store.keys().await
        }
    }

    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();

        async move {
            Self::check(&this.fail_writes, "write")?;
            this.store.clear().await
        }
    }
}
