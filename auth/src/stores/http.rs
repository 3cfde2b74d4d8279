//! HTTP tenant config remote.

use crate::config::RemoteConfig;
use crate::constants::TENANT_PLACEHOLDER;
use crate::error::{Result, SessionError};
use crate::providers::TenantConfigRemote;
use crate::state::TenantConfig;
use std::future::Future;

/// Downloads tenant configs from a per-tenant URL.
///
/// The URL template's `{tenant}` placeholder is replaced by the tenant id.
/// Any non-success status is an error, so an unknown tenant (typically a
/// 404) surfaces as [`SessionError::ConfigRequestFailed`].
#[derive(Debug, Clone)]
pub struct HttpTenantConfigRemote {
    client: reqwest::Client,
    url_template: String,
}

impl HttpTenantConfigRemote {
    /// Create a remote with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SessionError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, config.url_template.clone()))
    }

    /// Create a remote sharing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    /// Config URL for `tenant_id`.
    #[must_use]
    pub fn url_for(&self, tenant_id: &str) -> String {
        self.url_template.replace(TENANT_PLACEHOLDER, tenant_id)
    }
}

impl TenantConfigRemote for HttpTenantConfigRemote {
    fn download(&self, tenant_id: &str) -> impl Future<Output = Result<TenantConfig>> + Send {
        let url = self.url_for(tenant_id);

        async move {
            tracing::debug!(url = %url, "Downloading tenant config");

            let response = self.client.get(&url).send().await?;

            let status = response.status();
            if !status.is_success() {
                tracing::info!(url = %url, status = status.as_u16(), "Tenant config request rejected");
            }

            let config = response.error_for_status()?.json::<TenantConfig>().await?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_substitutes_tenant() {
        let remote = HttpTenantConfigRemote::with_client(
            reqwest::Client::new(),
            "https://{tenant}.workgrid.com/config/config.json",
        );

        assert_eq!(remote.url_for("acme"), "https://acme.workgrid.com/config/config.json");
    }
}
