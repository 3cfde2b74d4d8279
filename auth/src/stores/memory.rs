//! In-memory key-value store.

use crate::error::{Result, SessionError};
use crate::providers::KeyValueStore;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// In-memory key-value store.
///
/// Values live as long as any clone of the store. Useful for tests and
/// for hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

type Values = Arc<Mutex<BTreeMap<String, String>>>;

fn with_values<T>(values: &Values, f: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> Result<T> {
    let mut values = values
        .lock()
        .map_err(|_| SessionError::Storage("Mutex lock failed".to_string()))?;
    Ok(f(&mut values))
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        let values = Arc::clone(&self.values);
        let key = key.to_string();

        async move { with_values(&values, |values| values.get(&key).cloned()) }
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send {
        let values = Arc::clone(&self.values);
        let key = key.to_string();
        let value = value.to_string();

        async move {
            with_values(&values, |values| {
                values.insert(key, value);
            })
        }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        let values = Arc::clone(&self.values);
        let key = key.to_string();

        async move {
            with_values(&values, |values| {
                values.remove(&key);
            })
        }
    }

    fn keys(&self) -> impl Future<Output = Result<Vec<String>>> + Send {
        let values = Arc::clone(&self.values);

        async move { with_values(&values, |values| values.keys().cloned().collect()) }
    }

    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        let values = Arc::clone(&self.values);

        async move { with_values(&values, BTreeMap::clear) }
    }
}
