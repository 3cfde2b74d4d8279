//! Session state types.
//!
//! This module defines the tenant configuration document and the state
//! owned by the session reducer. Everything except the live session
//! adapter is `Clone + Serialize` so it can be snapshotted for diagnostics.

use crate::providers::SessionAdapter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════
// Tenant Configuration
// ═══════════════════════════════════════════════════════════════════════

/// Per-tenant configuration downloaded from the tenant's config endpoint.
///
/// ```json
/// {
///   "apiHost": "https://acme.example.com",
///   "cognito": {
///     "userPools": [{
///       "appDomain": "acme",
///       "userPoolId": "us-east-1_AbCd",
///       "clients": { "workgridclient": { "clientId": "abc123" } }
///     }]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    /// Tenant API base URL.
    pub api_host: String,

    /// Identity-provider details, absent for tenants without login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognito: Option<CognitoConfig>,
}

impl TenantConfig {
    /// Create a config with only an API host.
    #[must_use]
    pub fn new(api_host: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            cognito: None,
        }
    }

    /// Attach identity-provider details.
    #[must_use]
    pub fn with_cognito(mut self, cognito: CognitoConfig) -> Self {
        self.cognito = Some(cognito);
        self
    }
}

/// Identity-provider section of a [`TenantConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitoConfig {
    /// Configured user pools; sessions use the first one.
    pub user_pools: Vec<UserPool>,
}

/// A single identity-provider user pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPool {
    /// Hosted login domain prefix.
    #[serde(default)]
    pub app_domain: String,

    /// Pool id, `{region}_{suffix}`.
    pub user_pool_id: String,

    /// OAuth clients by name.
    #[serde(default)]
    pub clients: BTreeMap<String, PoolClient>,
}

impl UserPool {
    /// Create a pool with a single named client.
    #[must_use]
    pub fn new(
        user_pool_id: impl Into<String>,
        client_name: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        let mut clients = BTreeMap::new();
        clients.insert(
            client_name.into(),
            PoolClient {
                client_id: client_id.into(),
            },
        );

        Self {
            app_domain: String::new(),
            user_pool_id: user_pool_id.into(),
            clients,
        }
    }

    /// Region encoded in the pool id (the part before `_`).
    #[must_use]
    pub fn region(&self) -> &str {
        self.user_pool_id
            .split_once('_')
            .map_or(self.user_pool_id.as_str(), |(region, _)| region)
    }
}

/// OAuth client registered in a user pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolClient {
    /// OAuth client id.
    pub client_id: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Auth State
// ═══════════════════════════════════════════════════════════════════════

/// State owned by the session reducer.
///
/// `loading` overrides the other two flags; `authenticated` and
/// `show_sign_in` are never both set.
#[derive(Clone)]
pub struct AuthState {
    /// A resolution phase or user command is in flight.
    pub loading: bool,

    /// The caller should present sign-in.
    pub show_sign_in: bool,

    /// The identity session is valid.
    pub authenticated: bool,

    /// Active tenant id, possibly still being edited.
    pub company_code: Option<String>,

    /// Tenant id last read from durable storage.
    pub default_company_code: Option<String>,

    /// Whether the last config resolution for `company_code` succeeded.
    pub company_code_is_valid: bool,

    /// Tenant API host, set once config resolves.
    pub api_host: Option<String>,

    /// Identity session for the resolved tenant; replaced on tenant change.
    pub session_adapter: Option<Arc<dyn SessionAdapter>>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            loading: true,
            show_sign_in: false,
            authenticated: false,
            company_code: None,
            default_company_code: None,
            company_code_is_valid: true,
            api_host: None,
            session_adapter: None,
        }
    }
}

impl AuthState {
    /// Adapter-free copy of the state.
    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            loading: self.loading,
            show_sign_in: self.show_sign_in,
            authenticated: self.authenticated,
            company_code: self.company_code.clone(),
            default_company_code: self.default_company_code.clone(),
            company_code_is_valid: self.company_code_is_valid,
            api_host: self.api_host.clone(),
            has_session_adapter: self.session_adapter.is_some(),
        }
    }

    /// Classify the state into what the caller should present.
    ///
    /// Priority: loading, then authenticated, then sign-in. A tenant id with
    /// no flag set is waiting for its config resolution to start, which
    /// still counts as loading.
    #[must_use]
    pub fn view(&self) -> AuthView {
        if self.loading {
            AuthView::Loading
        } else if self.authenticated {
            AuthView::Authenticated {
                api_host: self.api_host.clone(),
            }
        } else if self.show_sign_in {
            AuthView::SignIn {
                company_code: self.company_code.clone(),
                default_company_code: self.default_company_code.clone(),
                company_code_is_valid: self.company_code_is_valid,
            }
        } else if self.company_code.is_some() {
            AuthView::Loading
        } else {
            AuthView::Unrecoverable
        }
    }
}

impl PartialEq for AuthState {
    fn eq(&self, other: &Self) -> bool {
        let same_adapter = match (&self.session_adapter, &other.session_adapter) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };

        same_adapter && self.snapshot() == other.snapshot()
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("loading", &self.loading)
            .field("show_sign_in", &self.show_sign_in)
            .field("authenticated", &self.authenticated)
            .field("company_code", &self.company_code)
            .field("default_company_code", &self.default_company_code)
            .field("company_code_is_valid", &self.company_code_is_valid)
            .field("api_host", &self.api_host)
            .field(
                "session_adapter",
                &self.session_adapter.as_ref().map(|_| "<session adapter>"),
            )
            .finish()
    }
}

/// Serializable view of [`AuthState`] without the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    /// See [`AuthState::loading`].
    pub loading: bool,
    /// See [`AuthState::show_sign_in`].
    pub show_sign_in: bool,
    /// See [`AuthState::authenticated`].
    pub authenticated: bool,
    /// See [`AuthState::company_code`].
    pub company_code: Option<String>,
    /// See [`AuthState::default_company_code`].
    pub default_company_code: Option<String>,
    /// See [`AuthState::company_code_is_valid`].
    pub company_code_is_valid: bool,
    /// See [`AuthState::api_host`].
    pub api_host: Option<String>,
    /// Whether a session adapter has been built.
    pub has_session_adapter: bool,
}

/// What the caller should present for a given [`AuthState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthView {
    /// Resolution in progress.
    Loading,

    /// Application access granted.
    Authenticated {
        /// Tenant API host.
        api_host: Option<String>,
    },

    /// Sign-in required.
    SignIn {
        /// Tenant id being edited.
        company_code: Option<String>,
        /// Tenant id read from storage.
        default_company_code: Option<String>,
        /// Whether `company_code` resolved to a config.
        company_code_is_valid: bool,
    },

    /// No flag set and no tenant id; only an explicit reset recovers.
    Unrecoverable,
}
