//! Tenant id and tenant config providers.

use crate::error::Result;
use crate::state::TenantConfig;
use std::future::Future;

/// Durable home of the tenant id.
pub trait TenantIdStore: Send + Sync {
    /// Read the stored tenant id.
    ///
    /// # Returns
    ///
    /// `None` when nothing (or an empty value) is stored.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage fails.
    fn fetch_tenant_id(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Persist `tenant_id` as the confirmed tenant.
    ///
    /// Called once a config resolved for the tenant, before the config is
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage fails.
    fn confirm_tenant_id(&self, tenant_id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Resolves a tenant id to its configuration.
pub trait TenantConfigSource: Send + Sync {
    /// Resolve the config for `tenant_id`.
    ///
    /// # Returns
    ///
    /// `None` when the tenant is not recognized. This is not an error.
    ///
    /// # Errors
    ///
    /// Returns error for transient failures (storage, network, bad status).
    fn fetch_tenant_config(
        &self,
        tenant_id: &str,
    ) -> impl Future<Output = Result<Option<TenantConfig>>> + Send;
}

/// Remote origin of tenant configs, consulted after the local cache.
pub trait TenantConfigRemote: Send + Sync {
    /// Download the config for `tenant_id`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The request cannot be sent
    /// - The endpoint answers with a non-success status
    /// - The body is not a valid config document
    fn download(&self, tenant_id: &str) -> impl Future<Output = Result<TenantConfig>> + Send;
}
