//! Session providers.
//!
//! This module defines traits for every external dependency of the session
//! layer. The reducer and the session handle depend only on these traits;
//! concrete stores live in [`crate::stores`] and test doubles in `mocks`.
//!
//! # Architecture
//!
//! ```text
//!  TenantIdStore ──► TenantConfigSource ──► SessionAdapterFactory ──► SessionAdapter
//!   (company code)     (tenant config)        (one per config)        (login, token)
//!
//!  DiagnosticsSink ◄── one breadcrumb per action, one exception per absorbed failure
//! ```
//!
//! Providers with a single implementation per environment are generic
//! parameters (static dispatch, futures returned with `impl Future + Send`).
//! Session adapters are built at runtime per tenant, so they are trait
//! objects behind [`async_trait`](async_trait::async_trait).

pub mod diagnostics;
pub mod session;
pub mod storage;
pub mod tenant;

// Re-export provider traits
pub use diagnostics::DiagnosticsSink;
pub use session::{ExternalReset, SessionAdapter, SessionAdapterFactory};
pub use storage::KeyValueStore;
pub use tenant::{TenantConfigRemote, TenantConfigSource, TenantIdStore};
