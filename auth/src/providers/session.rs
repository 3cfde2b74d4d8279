//! Identity session providers.

use crate::error::Result;
use crate::state::TenantConfig;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Identity-provider session for one tenant.
///
/// Login failures caused by the user dismissing the flow are reported as
/// [`SessionError::UserCancelled`](crate::SessionError::UserCancelled).
/// Adapters wrapping clients that only yield text can use
/// [`SessionError::from_platform_message`](crate::SessionError::from_platform_message).
#[async_trait]
pub trait SessionAdapter: Send + Sync {
    /// Whether a valid session exists.
    ///
    /// # Errors
    ///
    /// Returns error if the identity provider cannot be queried.
    async fn is_authenticated(&self) -> Result<bool>;

    /// Run the interactive login flow.
    ///
    /// # Errors
    ///
    /// Returns `UserCancelled` on dismissal, any other variant on failure.
    async fn login(&self) -> Result<()>;

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns error if the identity provider rejects the logout.
    async fn logout(&self) -> Result<()>;

    /// Current access token, refreshed if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the token cannot be obtained or refreshed.
    async fn get_access_token(&self) -> Result<Option<String>>;

    /// Drop locally persisted session material.
    ///
    /// # Errors
    ///
    /// Returns error if local storage cannot be cleared.
    async fn clear_local_state(&self) -> Result<()>;
}

/// Builds the session adapter for a resolved tenant config.
pub trait SessionAdapterFactory: Send + Sync {
    /// Build a fresh adapter. Called once per resolved config.
    fn build(&self, config: &TenantConfig) -> Arc<dyn SessionAdapter>;
}

/// Caller-supplied side effect run during a session reset.
pub trait ExternalReset: Send + Sync {
    /// Clear state owned outside the session (persisted tenant data, caches).
    ///
    /// # Errors
    ///
    /// Returns error if any part of the reset fails.
    fn reset(&self) -> impl Future<Output = Result<()>> + Send;
}
