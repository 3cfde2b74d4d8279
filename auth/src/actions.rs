//! Session actions.
//!
//! Every input to the session reducer: the three resolution phases, the
//! user commands, and the results of their I/O. The enum is closed, so an
//! unknown action type cannot reach the reducer.

use crate::state::TenantConfig;
use serde_json::{Value, json};

/// Session action.
///
/// `name()` is the kebab-case action type recorded as a breadcrumb before
/// each transition; `data()` is the payload attached to that breadcrumb.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Tenant-id Resolution
    // ═══════════════════════════════════════════════════════════════════════
    /// Tenant-id lookup is starting.
    TenantIdFetching,

    /// Tenant-id lookup resolved (possibly with nothing stored).
    TenantIdFetched {
        /// Stored tenant id; empty strings count as absent.
        tenant_id: Option<String>,
    },

    /// Tenant-id lookup failed.
    TenantIdFetchFailed,

    /// The tenant id was overridden by the user.
    TenantIdChanged {
        /// New tenant id; empty strings count as absent.
        tenant_id: Option<String>,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Config Resolution
    // ═══════════════════════════════════════════════════════════════════════
    /// Config resolution for `tenant_id` is starting.
    ConfigFetching {
        /// Tenant being resolved.
        tenant_id: String,
    },

    /// Config resolved and the tenant id was confirmed.
    ConfigFetched {
        /// Tenant that resolved.
        tenant_id: String,
        /// Its configuration.
        config: TenantConfig,
    },

    /// Config resolution failed; the tenant id is considered invalid.
    ConfigFetchFailed {
        /// Tenant that failed.
        tenant_id: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Session Check
    // ═══════════════════════════════════════════════════════════════════════
    /// Session adapter is about to be queried.
    SessionCheckStarting,

    /// Session adapter answered.
    SessionCheckFinished {
        /// Whether the identity session is valid.
        authenticated: bool,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // User Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Login is starting.
    SigninStarted,

    /// Login succeeded.
    SigninSucceeded,

    /// The user dismissed login.
    SigninCancelled,

    /// Login failed.
    SigninFailed,

    /// Logout is starting.
    SignoutStarted,

    /// Logout finished (successfully or not).
    SignoutSucceeded,

    /// Access token retrieval failed.
    TokenRefreshFailed,

    /// Reinitialize the state.
    Reset,
}

impl AuthAction {
    /// Kebab-case action type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TenantIdFetching => "tenant-id-fetching",
            Self::TenantIdFetched { .. } => "tenant-id-fetched",
            Self::TenantIdFetchFailed => "tenant-id-fetch-failed",
            Self::TenantIdChanged { .. } => "tenant-id-changed",
            Self::ConfigFetching { .. } => "config-fetching",
            Self::ConfigFetched { .. } => "config-fetched",
            Self::ConfigFetchFailed { .. } => "config-fetch-failed",
            Self::SessionCheckStarting => "session-check-starting",
            Self::SessionCheckFinished { .. } => "session-check-finished",
            Self::SigninStarted => "signin-started",
            Self::SigninSucceeded => "signin-succeeded",
            Self::SigninCancelled => "signin-cancelled",
            Self::SigninFailed => "signin-failed",
            Self::SignoutStarted => "signout-started",
            Self::SignoutSucceeded => "signout-succeeded",
            Self::TokenRefreshFailed => "token-refresh-failed",
            Self::Reset => "reset",
        }
    }

    /// Structured payload for actions that carry data.
    #[must_use]
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::TenantIdFetched { tenant_id } | Self::TenantIdChanged { tenant_id } => {
                Some(json!({ "tenantId": tenant_id }))
            },
            Self::ConfigFetching { tenant_id } | Self::ConfigFetchFailed { tenant_id } => {
                Some(json!({ "tenantId": tenant_id }))
            },
            Self::ConfigFetched { tenant_id, config } => Some(json!({
                "tenantId": tenant_id,
                "config": config,
            })),
            Self::SessionCheckFinished { authenticated } => {
                Some(json!({ "isAuthenticated": authenticated }))
            },
            Self::TenantIdFetching
            | Self::TenantIdFetchFailed
            | Self::SessionCheckStarting
            | Self::SigninStarted
            | Self::SigninSucceeded
            | Self::SigninCancelled
            | Self::SigninFailed
            | Self::SignoutStarted
            | Self::SignoutSucceeded
            | Self::TokenRefreshFailed
            | Self::Reset => None,
        }
    }

    /// Whether this action ends a sign-in command.
    #[must_use]
    pub const fn ends_sign_in(&self) -> bool {
        matches!(
            self,
            Self::SigninSucceeded | Self::SigninCancelled | Self::SigninFailed
        )
    }

    /// Whether this action ends a sign-out command.
    #[must_use]
    pub const fn ends_sign_out(&self) -> bool {
        matches!(self, Self::SignoutSucceeded)
    }
}

impl std::fmt::Display for AuthAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
