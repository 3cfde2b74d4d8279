//! Identity-provider client options derived from a tenant config.
//!
//! Session adapter factories use [`IdentityProviderOptions::for_tenant`] to
//! turn the tenant's user-pool description into the settings an OIDC client
//! needs. The protocol client itself is outside this crate.

use crate::config::IdentityConfig;
use crate::error::{Result, SessionError};
use crate::state::TenantConfig;
use std::fmt;
use std::str::FromStr;

/// Platform the session runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Browser build.
    Web,
    /// iOS app.
    Ios,
    /// Android app.
    Android,
}

impl Platform {
    /// Returns `true` for the app platforms.
    #[must_use]
    pub const fn is_native(self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }

    /// Lowercase platform name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl FromStr for Platform {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "web" => Ok(Self::Web),
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            other => Err(SessionError::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for an OIDC client bound to one tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProviderOptions {
    /// OAuth client id.
    pub client_id: String,
    /// OpenID discovery document URL.
    pub discovery_url: String,
    /// Requested scope.
    pub scope: String,
    /// Platform the options were derived for.
    pub platform: Platform,
    /// Where the provider redirects after login.
    pub redirect_uri: String,
    /// Where the provider redirects after logout.
    pub logout_url: String,
    /// Whether login runs in the shared system web view.
    pub shared_web_view: bool,
}

impl IdentityProviderOptions {
    /// Derive client options from the tenant's first user pool.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTenantConfig`] if the config has no
    /// user pool, or the pool has no client named `identity.client_key`.
    pub fn for_tenant(config: &TenantConfig, identity: &IdentityConfig) -> Result<Self> {
        let pool = config
            .cognito
            .as_ref()
            .and_then(|cognito| cognito.user_pools.first())
            .ok_or_else(|| SessionError::InvalidTenantConfig("no user pool configured".into()))?;

        let client = pool.clients.get(&identity.client_key).ok_or_else(|| {
            SessionError::InvalidTenantConfig(format!(
                "user pool {} has no client named {}",
                pool.user_pool_id, identity.client_key
            ))
        })?;

        let discovery_url = format!(
            "https://cognito-idp.{}.amazonaws.com/{}/.well-known/openid-configuration",
            pool.region(),
            pool.user_pool_id
        );

        let redirect_uri = if identity.platform.is_native() {
            identity.native_redirect_uri.clone()
        } else {
            identity.web_redirect_uri.clone()
        };

        Ok(Self {
            client_id: client.client_id.clone(),
            discovery_url,
            scope: identity.scope.clone(),
            platform: identity.platform,
            logout_url: redirect_uri.clone(),
            redirect_uri,
            shared_web_view: identity.platform.is_native(),
        })
    }
}
