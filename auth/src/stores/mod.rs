//! Storage implementations for the session layer.
//!
//! This module provides durable storage and config resolution:
//!
//! - **Key-value stores** (memory, JSON file) - Durable string values under fixed keys
//! - **Tenant-id store** - Company code persisted under `companyCode`
//! - **Tenant config source** - Cache under `globalConfig`, then the remote endpoint
//! - **HTTP remote** - Per-tenant config download
//! - **Persisted state reset** - Clears the tenant keys on session reset

pub mod file;
pub mod http;
pub mod memory;
pub mod reset;
pub mod tenant_config;
pub mod tenant_id;

// Re-exports
pub use file::FileKeyValueStore;
pub use http::HttpTenantConfigRemote;
pub use memory::MemoryKeyValueStore;
pub use reset::PersistedStateReset;
pub use tenant_config::CachedTenantConfigSource;
pub use tenant_id::StoredTenantId;
