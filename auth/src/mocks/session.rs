//! Mock session adapter, adapter factory and external reset.

use super::lock;
use crate::error::{Result, SessionError};
use crate::providers::{ExternalReset, SessionAdapter, SessionAdapterFactory};
use crate::state::TenantConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock session adapter.
///
/// Scripted outcome per operation. A successful login flips the session to
/// authenticated and a successful logout flips it back. An operation can be
/// gated so it is held until the test releases it.
#[derive(Debug, Clone)]
pub struct MockSessionAdapter {
    inner: Arc<Mutex<AdapterInner>>,
}

#[derive(Debug)]
struct AdapterInner {
    authenticated: Result<bool>,
    login: Result<()>,
    logout: Result<()>,
    token: Result<Option<String>>,
    clear: Result<()>,
    gates: HashMap<&'static str, Arc<Notify>>,
    calls: Vec<&'static str>,
}

impl MockSessionAdapter {
    /// Create an adapter with no session whose operations all succeed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(AdapterInner {
                authenticated: Ok(false),
                login: Ok(()),
                logout: Ok(()),
                token: Ok(Some("mock-access-token".to_string())),
                clear: Ok(()),
                gates: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Set whether a session exists.
    #[must_use]
    pub fn authenticated(self, authenticated: bool) -> Self {
        lock(&self.inner).authenticated = Ok(authenticated);
        self
    }

    /// Make the session check fail with `error`.
    #[must_use]
    pub fn failing_session_check(self, error: SessionError) -> Self {
        lock(&self.inner).authenticated = Err(error);
        self
    }

    /// Make login fail with `error`.
    #[must_use]
    pub fn failing_login(self, error: SessionError) -> Self {
        lock(&self.inner).login = Err(error);
        self
    }

    /// Make logout fail with `error`.
    #[must_use]
    pub fn failing_logout(self, error: SessionError) -> Self {
        lock(&self.inner).logout = Err(error);
        self
    }

    /// Answer token requests with `token`.
    #[must_use]
    pub fn with_token(self, token: Option<String>) -> Self {
        lock(&self.inner).token = Ok(token);
        self
    }

    /// Make token retrieval fail with `error`.
    #[must_use]
    pub fn failing_token(self, error: SessionError) -> Self {
        lock(&self.inner).token = Err(error);
        self
    }

    /// Make local-state clearing fail with `error`.
    #[must_use]
    pub fn failing_clear(self, error: SessionError) -> Self {
        lock(&self.inner).clear = Err(error);
        self
    }

    /// Hold `operation` (named as in [`calls`](Self::calls)) until the
    /// returned gate is notified.
    ///
    /// Each call consumes one notification.
    #[must_use]
    pub fn gate(&self, operation: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.inner).gates.insert(operation, Arc::clone(&gate));
        gate
    }

    /// Operations invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.inner).calls.clone()
    }

    /// How many times `operation` was invoked.
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        lock(&self.inner)
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    async fn record(&self, operation: &'static str) {
        let gate = {
            let mut inner = lock(&self.inner);
            inner.calls.push(operation);
            inner.gates.get(operation).cloned()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

impl Default for MockSessionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionAdapter for MockSessionAdapter {
    async fn is_authenticated(&self) -> Result<bool> {
        self.record("is_authenticated").await;
        lock(&self.inner).authenticated.clone()
    }

    async fn login(&self) -> Result<()> {
        self.record("login").await;
        let mut inner = lock(&self.inner);
        let outcome = inner.login.clone();
        if outcome.is_ok() {
            inner.authenticated = Ok(true);
        }
        outcome
    }

    async fn logout(&self) -> Result<()> {
        self.record("logout").await;
        let mut inner = lock(&self.inner);
        let outcome = inner.logout.clone();
        if outcome.is_ok() {
            inner.authenticated = Ok(false);
        }
        outcome
    }

    async fn get_access_token(&self) -> Result<Option<String>> {
        self.record("get_access_token").await;
        lock(&self.inner).token.clone()
    }

    async fn clear_local_state(&self) -> Result<()> {
        self.record("clear_local_state").await;
        lock(&self.inner).clear.clone()
    }
}

/// Mock adapter factory.
///
/// Hands out the adapter registered for the config's API host, or the
/// default adapter. Every build yields a new `Arc`, so successive adapters
/// are distinct instances even when they share scripted state.
#[derive(Debug, Clone)]
pub struct MockAdapterFactory {
    default_adapter: MockSessionAdapter,
    per_host: Arc<Mutex<HashMap<String, MockSessionAdapter>>>,
    builds: Arc<Mutex<Vec<TenantConfig>>>,
}

impl MockAdapterFactory {
    /// Create a factory handing out `adapter` for every tenant.
    #[must_use]
    pub fn new(adapter: MockSessionAdapter) -> Self {
        Self {
            default_adapter: adapter,
            per_host: Arc::new(Mutex::new(HashMap::new())),
            builds: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Hand out `adapter` for configs whose API host is `api_host`.
    #[must_use]
    pub fn with_adapter_for(self, api_host: impl Into<String>, adapter: MockSessionAdapter) -> Self {
        lock(&self.per_host).insert(api_host.into(), adapter);
        self
    }

    /// Configs adapters were built for, in order.
    #[must_use]
    pub fn builds(&self) -> Vec<TenantConfig> {
        lock(&self.builds).clone()
    }
}

impl SessionAdapterFactory for MockAdapterFactory {
    fn build(&self, config: &TenantConfig) -> Arc<dyn SessionAdapter> {
        lock(&self.builds).push(config.clone());

        let adapter = lock(&self.per_host)
            .get(&config.api_host)
            .cloned()
            .unwrap_or_else(|| self.default_adapter.clone());

        Arc::new(adapter)
    }
}

/// Mock external reset.
#[derive(Debug, Clone, Default)]
pub struct MockExternalReset {
    calls: Arc<AtomicUsize>,
    error: Option<SessionError>,
}

impl MockExternalReset {
    /// Create a reset that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every reset fail with `error`.
    #[must_use]
    pub fn failing(mut self, error: SessionError) -> Self {
        self.error = Some(error);
        self
    }

    /// Number of resets performed.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExternalReset for MockExternalReset {
    fn reset(&self) -> impl Future<Output = Result<()>> + Send {
        let calls = Arc::clone(&self.calls);
        let error = self.error.clone();

        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            error.map_or(Ok(()), Err)
        }
    }
}
