//! Mock tenant-id store and tenant config source.

use super::lock;
use crate::error::{Result, SessionError};
use crate::providers::{TenantConfigSource, TenantIdStore};
use crate::state::TenantConfig;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock tenant-id store.
///
/// Holds the stored id in memory and records confirmations.
#[derive(Debug, Clone, Default)]
pub struct MockTenantIdStore {
    inner: Arc<Mutex<TenantIdInner>>,
}

#[derive(Debug, Default)]
struct TenantIdInner {
    stored: Option<String>,
    fetch_error: Option<SessionError>,
    confirm_error: Option<SessionError>,
    confirmed: Vec<String>,
    fetch_calls: usize,
}

impl MockTenantIdStore {
    /// Create a store with nothing stored.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `tenant_id` stored.
    #[must_use]
    pub fn with_tenant_id(self, tenant_id: impl Into<String>) -> Self {
        lock(&self.inner).stored = Some(tenant_id.into());
        self
    }

    /// Make every lookup fail with `error`.
    #[must_use]
    pub fn failing_fetch(self, error: SessionError) -> Self {
        lock(&self.inner).fetch_error = Some(error);
        self
    }

    /// Make every confirmation fail with `error`.
    #[must_use]
    pub fn failing_confirm(self, error: SessionError) -> Self {
        lock(&self.inner).confirm_error = Some(error);
        self
    }

    /// Tenant ids confirmed so far, in order.
    #[must_use]
    pub fn confirmed(&self) -> Vec<String> {
        lock(&self.inner).confirmed.clone()
    }

    /// Currently stored tenant id.
    #[must_use]
    pub fn stored(&self) -> Option<String> {
        lock(&self.inner).stored.clone()
    }

    /// Number of lookups performed.
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        lock(&self.inner).fetch_calls
    }
}

impl TenantIdStore for MockTenantIdStore {
    fn fetch_tenant_id(&self) -> impl Future<Output = Result<Option<String>>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let mut inner = lock(&inner);
            inner.fetch_calls += 1;
            match &inner.fetch_error {
                Some(error) => Err(error.clone()),
                None => Ok(inner.stored.clone()),
            }
        }
    }

    fn confirm_tenant_id(&self, tenant_id: &str) -> impl Future<Output = Result<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let tenant_id = tenant_id.to_string();

        async move {
            let mut inner = lock(&inner);
            if let Some(error) = &inner.confirm_error {
                return Err(error.clone());
            }
            inner.confirmed.push(tenant_id.clone());
            inner.stored = Some(tenant_id);
            Ok(())
        }
    }
}

/// Mock tenant config source.
///
/// Answers are scripted per tenant id; unscripted ids are "not recognized".
/// A tenant can be gated so its answer is held until the test releases it.
#[derive(Debug, Clone, Default)]
pub struct MockTenantConfigSource {
    inner: Arc<Mutex<ConfigInner>>,
}

#[derive(Debug, Default)]
struct ConfigInner {
    scripted: HashMap<String, Scripted>,
    requests: Vec<String>,
}

#[derive(Debug)]
struct Scripted {
    outcome: Result<Option<TenantConfig>>,
    gate: Option<Arc<Notify>>,
}

impl MockTenantConfigSource {
    /// Create a source that recognizes no tenant.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `tenant_id` to `config`.
    #[must_use]
    pub fn with_config(self, tenant_id: impl Into<String>, config: TenantConfig) -> Self {
        self.script(tenant_id.into(), Ok(Some(config)));
        self
    }

    /// Fail resolution of `tenant_id` with `error`.
    #[must_use]
    pub fn with_error(self, tenant_id: impl Into<String>, error: SessionError) -> Self {
        self.script(tenant_id.into(), Err(error));
        self
    }

    /// Hold every answer for `tenant_id` until the returned gate is notified.
    ///
    /// Each resolution consumes one notification.
    #[must_use]
    pub fn gate(&self, tenant_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.inner)
            .scripted
            .entry(tenant_id.to_string())
            .or_insert_with(|| Scripted {
                outcome: Ok(None),
                gate: None,
            })
            .gate = Some(Arc::clone(&gate));
        gate
    }

    /// Tenant ids requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.inner).requests.clone()
    }

    fn script(&self, tenant_id: String, outcome: Result<Option<TenantConfig>>) {
        let mut inner = lock(&self.inner);
        let gate = inner.scripted.remove(&tenant_id).and_then(|s| s.gate);
        inner.scripted.insert(tenant_id, Scripted { outcome, gate });
    }
}

impl TenantConfigSource for MockTenantConfigSource {
    fn fetch_tenant_config(
        &self,
        tenant_id: &str,
    ) -> impl Future<Output = Result<Option<TenantConfig>>> + Send {
        let inner = Arc::clone(&self.inner);
        let tenant_id = tenant_id.to_string();

        async move {
            let (outcome, gate) = {
                let mut inner = lock(&inner);
                inner.requests.push(tenant_id.clone());
                inner
                    .scripted
                    .get(&tenant_id)
                    .map_or((Ok(None), None), |s| (s.outcome.clone(), s.gate.clone()))
            };

            if let Some(gate) = gate {
                gate.notified().await;
            }

            outcome
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_updates_stored_id() {
        let store = MockTenantIdStore::new();
        store.confirm_tenant_id("acme").await.unwrap();

        assert_eq!(store.fetch_tenant_id().await.unwrap(), Some("acme".to_string()));
        assert_eq!(store.confirmed(), vec!["acme".to_string()]);
    }

    #[tokio::test]
    async fn test_unscripted_tenant_is_unknown() {
        let source = MockTenantConfigSource::new();
        assert_eq!(source.fetch_tenant_config("nobody").await.unwrap(), None);
        assert_eq!(source.requests(), vec!["nobody".to_string()]);
    }

    #[tokio::test]
    async fn test_gate_survives_later_script() {
        let source = MockTenantConfigSource::new();
        let gate = source.gate("acme");
        let source = source.with_config("acme", TenantConfig::new("https://acme.example.com"));

        gate.notify_one();
        let config = source.fetch_tenant_config("acme").await.unwrap();
        assert_eq!(config, Some(TenantConfig::new("https://acme.example.com")));
    }
}
