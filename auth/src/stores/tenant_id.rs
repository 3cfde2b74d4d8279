//! Tenant-id store over a key-value store.

use crate::constants::storage_keys;
use crate::error::Result;
use crate::providers::{KeyValueStore, TenantIdStore};
use std::future::Future;

/// Persists the tenant id under the `companyCode` key.
///
/// An empty stored value reads as "no tenant id".
#[derive(Debug, Clone)]
pub struct StoredTenantId<K> {
    store: K,
}

impl<K: KeyValueStore> StoredTenantId<K> {
    /// Create a tenant-id store over `store`.
    #[must_use]
    pub const fn new(store: K) -> Self {
        Self { store }
    }

    /// Forget the stored tenant id.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying store cannot be written.
    pub async fn reset(&self) -> Result<()> {
        self.store.remove(storage_keys::TENANT_ID).await
    }
}

impl<K: KeyValueStore> TenantIdStore for StoredTenantId<K> {
    fn fetch_tenant_id(&self) -> impl Future<Output = Result<Option<String>>> + Send {
        async move {
            let value = self.store.get(storage_keys::TENANT_ID).await?;
            Ok(value.filter(|id| !id.is_empty()))
        }
    }

    fn confirm_tenant_id(&self, tenant_id: &str) -> impl Future<Output = Result<()>> + Send {
        async move {
            tracing::debug!(tenant_id, "Persisting confirmed tenant id");
            self.store.set(storage_keys::TENANT_ID, tenant_id).await
        }
    }
}
