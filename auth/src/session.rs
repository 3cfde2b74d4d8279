//! Session handle.
//!
//! [`AuthSession`] owns the Store running the session reducer and exposes
//! the operations callers use: start resolution, sign in and out, switch
//! tenants, fetch tokens and reset. Providers are injected once, at
//! construction.
//!
//! # Example
//!
//! ```ignore
//! let session = AuthSession::new(environment, external_reset, SessionConfig::default());
//! session.start().await?;
//! session.settled().await?;
//!
//! match session.view().await {
//!     AuthView::SignIn { .. } => { session.sign_in().await?; },
//!     AuthView::Authenticated { .. } => {},
//!     _ => {},
//! }
//! ```

use crate::actions::AuthAction;
use crate::config::SessionConfig;
use crate::constants::AUTH_STATE_BREADCRUMB;
use crate::environment::SessionEnvironment;
use crate::error::{Result, SessionError};
use crate::providers::{
    DiagnosticsSink, ExternalReset, SessionAdapter, SessionAdapterFactory, TenantConfigSource,
    TenantIdStore,
};
use crate::reducers::SessionReducer;
use crate::state::{AuthSnapshot, AuthState, AuthView};
use std::sync::Arc;
use tenant_session_runtime::Store;
use tokio::sync::broadcast;

/// Store type driving a session.
pub type SessionStore<T, C, F, D> =
    Store<AuthState, AuthAction, SessionEnvironment<T, C, F, D>, SessionReducer<T, C, F, D>>;

/// Handle over one session scope.
///
/// # Type Parameters
///
/// - `T`: Tenant-id store
/// - `C`: Tenant config source
/// - `F`: Session adapter factory
/// - `D`: Diagnostics sink
/// - `X`: External reset
pub struct AuthSession<T, C, F, D, X>
where
    T: TenantIdStore + Clone + 'static,
    C: TenantConfigSource + Clone + 'static,
    F: SessionAdapterFactory + Clone + 'static,
    D: DiagnosticsSink + Clone + 'static,
    X: ExternalReset,
{
    store: SessionStore<T, C, F, D>,
    external_reset: X,
    config: SessionConfig,
}

impl<T, C, F, D, X> AuthSession<T, C, F, D, X>
where
    T: TenantIdStore + Clone + 'static,
    C: TenantConfigSource + Clone + 'static,
    F: SessionAdapterFactory + Clone + 'static,
    D: DiagnosticsSink + Clone + 'static,
    X: ExternalReset,
{
    /// Create a session in its initial (loading) state.
    ///
    /// Nothing runs until [`start`](Self::start).
    #[must_use]
    pub fn new(
        environment: SessionEnvironment<T, C, F, D>,
        external_reset: X,
        config: SessionConfig,
    ) -> Self {
        let store = Store::with_broadcast_capacity(
            AuthState::default(),
            SessionReducer::new(),
            environment,
            config.broadcast_capacity,
        );

        Self {
            store,
            external_reset,
            config,
        }
    }

    /// Configuration the session was built with.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Injected providers.
    #[must_use]
    pub const fn environment(&self) -> &SessionEnvironment<T, C, F, D> {
        self.store.environment()
    }

    fn diagnostics(&self) -> &D {
        &self.store.environment().diagnostics
    }

    /// Begin tenant-id resolution.
    ///
    /// Resolution continues in the background; use [`settled`](Self::settled)
    /// or [`subscribe_actions`](Self::subscribe_actions) to follow it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the session is shutting down.
    pub async fn start(&self) -> Result<()> {
        tracing::info!("Starting session resolution");
        self.store.send(AuthAction::TenantIdFetching).await?;
        Ok(())
    }

    /// Run the interactive login and wait for its outcome.
    ///
    /// # Returns
    ///
    /// The terminal action: `SigninSucceeded`, `SigninCancelled` or `SigninFailed`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the session is shutting down, or
    /// if no outcome arrives within the interaction timeout (for instance
    /// because a tenant switch or reset superseded the login).
    pub async fn sign_in(&self) -> Result<AuthAction> {
        let outcome = self
            .store
            .send_and_wait_for(
                AuthAction::SigninStarted,
                AuthAction::ends_sign_in,
                self.config.interaction_timeout,
            )
            .await?;

        tracing::info!(outcome = outcome.name(), "Sign-in finished");
        Ok(outcome)
    }

    /// Log out and wait until the sign-in screen is shown.
    ///
    /// Logout failures are reported to diagnostics and still end signed out.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the session is shutting down or
    /// the sign-out is superseded.
    pub async fn sign_out(&self) -> Result<()> {
        self.store
            .send_and_wait_for(
                AuthAction::SignoutStarted,
                AuthAction::ends_sign_out,
                self.config.interaction_timeout,
            )
            .await?;

        tracing::info!("Signed out");
        Ok(())
    }

    /// Switch to another tenant.
    ///
    /// An empty id clears the tenant and cancels any config resolution in
    /// flight.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the session is shutting down.
    pub async fn change_tenant_id(&self, tenant_id: impl Into<String>) -> Result<()> {
        let tenant_id = tenant_id.into();
        tracing::info!(tenant_id = %tenant_id, "Changing tenant");

        self.store
            .send(AuthAction::TenantIdChanged {
                tenant_id: Some(tenant_id),
            })
            .await?;
        Ok(())
    }

    /// Current access token.
    ///
    /// Never fails: a token error is reported, moves the session to
    /// sign-in (`token-refresh-failed`) and yields `None`. `None` is also
    /// returned while no adapter exists.
    pub async fn get_access_token(&self) -> Option<String> {
        let adapter = self.adapter().await?;

        match adapter.get_access_token().await {
            Ok(token) => token,
            Err(error) => {
                tracing::warn!(error = %error, "Access token unavailable");
                self.diagnostics().record_exception(&error);

                if let Err(error) = self.store.send(AuthAction::TokenRefreshFailed).await {
                    tracing::warn!(error = %error, "Could not record token refresh failure");
                }
                None
            },
        }
    }

    /// Reset the session.
    ///
    /// Clears the adapter's local state and runs the external reset
    /// concurrently. Once both settle, the state is reinitialized whatever
    /// their outcome, every resolution phase in flight is cancelled and
    /// tenant-id resolution starts over.
    ///
    /// # Errors
    ///
    /// Returns the adapter failure if clearing failed, otherwise the
    /// external reset failure. The reset itself has already been applied.
    pub async fn reset(&self) -> Result<()> {
        tracing::info!("Resetting session");
        let adapter = self.adapter().await;

        let clear_adapter = async {
            match adapter {
                Some(adapter) => adapter.clear_local_state().await,
                None => Ok(()),
            }
        };
        let (cleared, external) = tokio::join!(clear_adapter, self.external_reset.reset());

        for error in [&cleared, &external].into_iter().filter_map(|r| r.as_ref().err()) {
            tracing::warn!(error = %error, "Reset step failed");
            self.diagnostics().record_exception(error);
        }

        self.store.send(AuthAction::Reset).await?;
        self.store.send(AuthAction::TenantIdFetching).await?;

        cleared.and(external)
    }

    /// Read the state through a closure.
    pub async fn state<G, R>(&self, f: G) -> R
    where
        G: FnOnce(&AuthState) -> R,
    {
        self.store.state(f).await
    }

    /// Adapter-free copy of the state.
    pub async fn snapshot(&self) -> AuthSnapshot {
        self.store.state(AuthState::snapshot).await
    }

    /// What the caller should present.
    ///
    /// An [`AuthView::Unrecoverable`] classification is reported to
    /// diagnostics (an `auth state` breadcrumb carrying the snapshot, then
    /// [`SessionError::UnknownAuthenticationState`]). Only
    /// [`reset`](Self::reset) recovers from it.
    pub async fn view(&self) -> AuthView {
        let (view, snapshot) = self.store.state(|s| (s.view(), s.snapshot())).await;

        if matches!(view, AuthView::Unrecoverable) {
            tracing::error!(state = ?snapshot, "Session reached an unknown state");
            self.diagnostics()
                .record_breadcrumb(AUTH_STATE_BREADCRUMB, serde_json::to_value(&snapshot).ok());
            self.diagnostics()
                .record_exception(&SessionError::UnknownAuthenticationState);
        }

        view
    }

    /// Operations available only while authenticated.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAuthenticated`] unless the session is
    /// authenticated and idle.
    pub async fn authenticated_context(&self) -> Result<AuthContext<'_, T, C, F, D, X>> {
        match self.store.state(AuthState::view).await {
            AuthView::Authenticated { api_host } => Ok(AuthContext {
                session: self,
                api_host,
            }),
            _ => Err(SessionError::NotAuthenticated),
        }
    }

    /// Observe actions produced by the session's effects.
    ///
    /// Actions from superseded phases are never broadcast.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<AuthAction> {
        self.store.subscribe_actions()
    }

    /// Wait until no resolution step is running.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if work is still running after the
    /// settle timeout.
    pub async fn settled(&self) -> Result<()> {
        self.store.settled(self.config.settle_timeout).await?;
        Ok(())
    }

    /// Stop accepting operations and wait for running ones.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if work is still running after the
    /// settle timeout.
    pub async fn shutdown(&self) -> Result<()> {
        self.store.shutdown(self.config.settle_timeout).await?;
        Ok(())
    }

    async fn adapter(&self) -> Option<Arc<dyn SessionAdapter>> {
        self.store.state(|s| s.session_adapter.clone()).await
    }
}

/// Authenticated view of a session.
///
/// Obtained from [`AuthSession::authenticated_context`].
pub struct AuthContext<'a, T, C, F, D, X>
where
    T: TenantIdStore + Clone + 'static,
    C: TenantConfigSource + Clone + 'static,
    F: SessionAdapterFactory + Clone + 'static,
    D: DiagnosticsSink + Clone + 'static,
    X: ExternalReset,
{
    session: &'a AuthSession<T, C, F, D, X>,
    api_host: Option<String>,
}

impl<T, C, F, D, X> AuthContext<'_, T, C, F, D, X>
where
    T: TenantIdStore + Clone + 'static,
    C: TenantConfigSource + Clone + 'static,
    F: SessionAdapterFactory + Clone + 'static,
    D: DiagnosticsSink + Clone + 'static,
    X: ExternalReset,
{
    /// API host of the tenant the session is authenticated with.
    #[must_use]
    pub fn api_host(&self) -> Option<&str> {
        self.api_host.as_deref()
    }

    /// See [`AuthSession::get_access_token`].
    pub async fn get_access_token(&self) -> Option<String> {
        self.session.get_access_token().await
    }

    /// See [`AuthSession::sign_out`].
    ///
    /// # Errors
    ///
    /// Same as [`AuthSession::sign_out`].
    pub async fn sign_out(&self) -> Result<()> {
        self.session.sign_out().await
    }
}

impl<T, C, F, D, X> std::fmt::Debug for AuthSession<T, C, F, D, X>
where
    T: TenantIdStore + Clone + 'static,
    C: TenantConfigSource + Clone + 'static,
    F: SessionAdapterFactory + Clone + 'static,
    D: DiagnosticsSink + Clone + 'static,
    X: ExternalReset,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("config", &self.config)
            .field("pending_effects", &self.store.pending_effects())
            .finish_non_exhaustive()
    }
}
