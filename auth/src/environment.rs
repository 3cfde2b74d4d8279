//! Session environment.
//!
//! This module defines the environment type for dependency injection
//! in the session reducer.

use crate::providers::{DiagnosticsSink, SessionAdapterFactory, TenantConfigSource, TenantIdStore};

/// Session environment.
///
/// Contains all external dependencies needed by the session reducer.
/// Each provider is cloned into the effects that use it, so providers are
/// expected to be cheap handles over shared state.
///
/// # Type Parameters
///
/// - `T`: Tenant-id store
/// - `C`: Tenant config source
/// - `F`: Session adapter factory
/// - `D`: Diagnostics sink
#[derive(Clone)]
pub struct SessionEnvironment<T, C, F, D>
where
    T: TenantIdStore + Clone,
    C: TenantConfigSource + Clone,
    F: SessionAdapterFactory + Clone,
    D: DiagnosticsSink + Clone,
{
    /// Tenant-id store (durable company code).
    pub tenant_ids: T,

    /// Tenant config source (cache, then remote).
    pub configs: C,

    /// Builds one session adapter per resolved config.
    pub adapters: F,

    /// Breadcrumbs and captured exceptions.
    pub diagnostics: D,
}

impl<T, C, F, D> SessionEnvironment<T, C, F, D>
where
    T: TenantIdStore + Clone,
    C: TenantConfigSource + Clone,
    F: SessionAdapterFactory + Clone,
    D: DiagnosticsSink + Clone,
{
    /// Create a new session environment.
    #[must_use]
    pub const fn new(tenant_ids: T, configs: C, adapters: F, diagnostics: D) -> Self {
        Self {
            tenant_ids,
            configs,
            adapters,
            diagnostics,
        }
    }
}
