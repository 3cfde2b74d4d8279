//! Cache-then-remote tenant config resolution.

use crate::constants::storage_keys;
use crate::error::Result;
use crate::providers::{DiagnosticsSink, KeyValueStore, TenantConfigRemote, TenantConfigSource};
use crate::state::TenantConfig;
use serde_json::{Map, Value};
use std::future::Future;

/// Resolves tenant configs from the `globalConfig` cache entry, falling back
/// to a remote and caching what it returns.
///
/// The cache entry is a JSON object keyed by tenant id. A cache that cannot
/// be parsed is reported and replaced on the next successful download; a
/// failing cache write is reported but does not fail the resolution. Remote
/// failures are returned as errors, including "tenant not found" statuses.
#[derive(Debug, Clone)]
pub struct CachedTenantConfigSource<K, R, D> {
    store: K,
    remote: R,
    diagnostics: D,
}

impl<K, R, D> CachedTenantConfigSource<K, R, D>
where
    K: KeyValueStore,
    R: TenantConfigRemote,
    D: DiagnosticsSink,
{
    /// Create a source caching `remote` results in `store`.
    #[must_use]
    pub const fn new(store: K, remote: R, diagnostics: D) -> Self {
        Self {
            store,
            remote,
            diagnostics,
        }
    }

    /// Drop every cached config.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying store cannot be written.
    pub async fn reset(&self) -> Result<()> {
        self.store.remove(storage_keys::CONFIG_CACHE).await
    }

    /// Read the cache object; unreadable content counts as empty.
    async fn read_cache(&self) -> Result<Map<String, Value>> {
        let Some(raw) = self.store.get(storage_keys::CONFIG_CACHE).await? else {
            return Ok(Map::new());
        };

        if raw.is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Map<String, Value>>(&raw) {
            Ok(cache) => Ok(cache),
            Err(error) => {
                tracing::warn!(error = %error, "Discarding unreadable config cache");
                self.diagnostics.record_exception(&error.into());
                Ok(Map::new())
            },
        }
    }

    fn cached_entry(&self, cache: &Map<String, Value>, tenant_id: &str) -> Option<TenantConfig> {
        let entry = cache.get(tenant_id)?;
        match serde_json::from_value(entry.clone()) {
            Ok(config) => Some(config),
            Err(error) => {
                tracing::warn!(tenant_id, error = %error, "Ignoring malformed cached config");
                self.diagnostics.record_exception(&error.into());
                None
            },
        }
    }

    async fn write_cache(&self, cache: &Map<String, Value>) {
        let result = match serde_json::to_string(cache) {
            Ok(raw) => self.store.set(storage_keys::CONFIG_CACHE, &raw).await,
            Err(error) => Err(error.into()),
        };

        if let Err(error) = result {
            tracing::warn!(error = %error, "Could not update config cache");
            self.diagnostics.record_exception(&error);
        }
    }
}

impl<K, R, D> TenantConfigSource for CachedTenantConfigSource<K, R, D>
where
    K: KeyValueStore,
    R: TenantConfigRemote,
    D: DiagnosticsSink,
{
    fn fetch_tenant_config(
        &self,
        tenant_id: &str,
    ) -> impl Future<Output = Result<Option<TenantConfig>>> + Send {
        async move {
            let mut cache = self.read_cache().await?;

            if let Some(config) = self.cached_entry(&cache, tenant_id) {
                tracing::debug!(tenant_id, "Tenant config served from cache");
                return Ok(Some(config));
            }

            let config = self.remote.download(tenant_id).await?;
            tracing::debug!(tenant_id, api_host = %config.api_host, "Tenant config downloaded");

            cache.insert(tenant_id.to_string(), serde_json::to_value(&config)?);
            self.write_cache(&cache).await;

            Ok(Some(config))
        }
    }
}
