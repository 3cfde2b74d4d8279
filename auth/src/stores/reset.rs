//! Reset of persisted tenant state.

use crate::constants::storage_keys;
use crate::error::Result;
use crate::providers::{ExternalReset, KeyValueStore};
use std::future::Future;

/// Removes the stored tenant id and the config cache.
///
/// Both removals run concurrently; the first failure is returned after both
/// settle.
#[derive(Debug, Clone)]
pub struct PersistedStateReset<K> {
    store: K,
}

impl<K: KeyValueStore> PersistedStateReset<K> {
    /// Create a reset over `store`.
    #[must_use]
    pub const fn new(store: K) -> Self {
        Self { store }
    }
}

impl<K: KeyValueStore> ExternalReset for PersistedStateReset<K> {
    fn reset(&self) -> impl Future<Output = Result<()>> + Send {
        async move {
            let (tenant_id, config_cache) = tokio::join!(
                self.store.remove(storage_keys::TENANT_ID),
                self.store.remove(storage_keys::CONFIG_CACHE),
            );
            tracing::debug!("Cleared persisted tenant state");
            tenant_id.and(config_cache)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use crate::stores::MemoryKeyValueStore;

    #[tokio::test]
    async fn test_reset_keeps_unrelated_keys() {
        let store = MemoryKeyValueStore::new();
        store.set(storage_keys::TENANT_ID, "acme").await.unwrap();
        store.set(storage_keys::CONFIG_CACHE, "{}").await.unwrap();
        store.set(storage_keys::CURRENT_SPACE, "7").await.unwrap();

        PersistedStateReset::new(store.clone()).reset().await.unwrap();

        assert_eq!(
            store.keys().await.unwrap(),
            vec![storage_keys::CURRENT_SPACE.to_string()]
        );
    }
}
