//! Session configuration.
//!
//! This module provides configuration structures for the session layer.
//! Defaults match a local web build; deployments override them through
//! the builder methods or [`SessionConfig::from_env`].

use crate::constants::{
    DEFAULT_CLIENT_KEY, DEFAULT_CONFIG_URL_TEMPLATE, DEFAULT_NATIVE_REDIRECT_URI, DEFAULT_SCOPE,
    DEFAULT_WEB_REDIRECT_URI,
};
use crate::error::Result;
use crate::identity::Platform;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding [`SessionConfig::storage_path`].
pub const ENV_STORAGE_PATH: &str = "TENANT_SESSION_STORAGE_PATH";

/// Environment variable overriding [`RemoteConfig::url_template`].
pub const ENV_CONFIG_URL: &str = "TENANT_SESSION_CONFIG_URL";

/// Environment variable overriding [`IdentityConfig::platform`].
pub const ENV_PLATFORM: &str = "TENANT_SESSION_PLATFORM";

/// Remote tenant config endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// URL with a `{tenant}` placeholder for the tenant id.
    ///
    /// Default: `https://{tenant}.workgrid.com/config/config.json`
    pub url_template: String,

    /// Per-request timeout.
    ///
    /// Default: 10 seconds
    pub request_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_CONFIG_URL_TEMPLATE.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Identity provider settings shared by every tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Platform the session runs on. Selects the redirect URI.
    pub platform: Platform,

    /// Name of the pool client to sign in with.
    pub client_key: String,

    /// Requested OAuth scope.
    pub scope: String,

    /// Redirect URI on the web platform.
    pub web_redirect_uri: String,

    /// Redirect URI on native platforms.
    pub native_redirect_uri: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Web,
            client_key: DEFAULT_CLIENT_KEY.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            web_redirect_uri: DEFAULT_WEB_REDIRECT_URI.to_string(),
            native_redirect_uri: DEFAULT_NATIVE_REDIRECT_URI.to_string(),
        }
    }
}

/// Session layer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Key-value file used by durable deployments.
    ///
    /// Default: `tenant-session.json` in the working directory
    pub storage_path: PathBuf,

    /// Remote config endpoint.
    pub remote: RemoteConfig,

    /// Identity provider settings.
    pub identity: IdentityConfig,

    /// Breadcrumbs kept by the tracing diagnostics sink.
    ///
    /// Default: 100
    pub breadcrumb_capacity: usize,

    /// Capacity of the action broadcast channel.
    ///
    /// Default: 64
    pub broadcast_capacity: usize,

    /// Upper bound for [`settled`](crate::AuthSession::settled) and shutdown.
    ///
    /// Default: 30 seconds
    pub settle_timeout: Duration,

    /// How long sign-in and sign-out wait for their outcome.
    ///
    /// Default: 5 minutes (an interactive login may be slow)
    pub interaction_timeout: Duration,
}

impl SessionConfig {
    /// Create configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build configuration from `TENANT_SESSION_*` environment variables,
    /// falling back to defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnsupportedPlatform`](crate::SessionError::UnsupportedPlatform)
    /// if `TENANT_SESSION_PLATFORM` names an unknown platform.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var(ENV_STORAGE_PATH) {
            config.storage_path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var(ENV_CONFIG_URL) {
            config.remote.url_template = url;
        }
        if let Ok(platform) = std::env::var(ENV_PLATFORM) {
            config.identity.platform = platform.parse()?;
        }

        Ok(config)
    }

    /// Set the key-value file.
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Set the remote config URL template.
    #[must_use]
    pub fn with_config_url(mut self, url_template: impl Into<String>) -> Self {
        self.remote.url_template = url_template.into();
        self
    }

    /// Set the remote request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.remote.request_timeout = timeout;
        self
    }

    /// Set the platform.
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.identity.platform = platform;
        self
    }

    /// Set the breadcrumb capacity.
    #[must_use]
    pub const fn with_breadcrumb_capacity(mut self, capacity: usize) -> Self {
        self.breadcrumb_capacity = capacity;
        self
    }

    /// Set the action broadcast capacity.
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the settle timeout.
    #[must_use]
    pub const fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// Set the sign-in/sign-out timeout.
    #[must_use]
    pub const fn with_interaction_timeout(mut self, timeout: Duration) -> Self {
        self.interaction_timeout = timeout;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("tenant-session.json"),
            remote: RemoteConfig::default(),
            identity: IdentityConfig::default(),
            breadcrumb_capacity: 100,
            broadcast_capacity: 64,
            settle_timeout: Duration::from_secs(30),
            interaction_timeout: Duration::from_secs(300),
        }
    }
}
