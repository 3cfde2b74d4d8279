//! # Tenant Session Auth
//!
//! Client-side session orchestration for a multi-tenant application:
//! resolve the tenant id ("company code"), resolve the tenant's config,
//! build an identity-provider session adapter for it, and decide whether
//! the user is signed in.
//!
//! ## Architecture
//!
//! The session is a reducer over [`AuthState`] driven by a
//! [`Store`](tenant_session_runtime::Store):
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! Each asynchronous resolution phase (tenant id, config, session check,
//! sign-in/sign-out) runs as a cancellable effect. Starting a phase again,
//! switching tenants or resetting makes the previous instance stale, and
//! nothing it produces reaches the state.
//!
//! External collaborators are traits in [`providers`]; concrete storage and
//! HTTP implementations live in [`stores`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use tenant_session_auth::*;
//!
//! let environment = SessionEnvironment::new(tenant_ids, configs, adapter_factory, diagnostics);
//! let session = AuthSession::new(environment, external_reset, SessionConfig::from_env()?);
//!
//! session.start().await?;
//! session.settled().await?;
//!
//! if let AuthView::SignIn { .. } = session.view().await {
//!     session.change_tenant_id("acme").await?;
//!     session.settled().await?;
//!     session.sign_in().await?;
//! }
//!
//! let token = session.authenticated_context().await?.get_access_token().await;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod identity;
pub mod providers;
pub mod reducers;
pub mod session;
pub mod state;
pub mod stores;

// Mocks for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-exports
pub use actions::AuthAction;
pub use config::{IdentityConfig, RemoteConfig, SessionConfig};
pub use diagnostics::{Breadcrumb, TracingDiagnostics};
pub use environment::SessionEnvironment;
pub use error::{Result, SessionError};
pub use identity::{IdentityProviderOptions, Platform};
pub use reducers::SessionReducer;
pub use session::{AuthContext, AuthSession, SessionStore};
pub use state::{AuthSnapshot, AuthState, AuthView, CognitoConfig, PoolClient, TenantConfig, UserPool};
