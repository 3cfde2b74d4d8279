//! Session constants.
//!
//! This module contains constant values shared by the stores, the identity
//! options and the session reducer.

/// Keys used in the durable key-value store.
pub mod storage_keys {
    /// Persisted tenant identifier ("company code").
    pub const TENANT_ID: &str = "companyCode";

    /// Cached tenant configurations, a JSON object keyed by tenant id.
    pub const CONFIG_CACHE: &str = "globalConfig";

    /// Active space id, owned by the space-selection collaborator.
    pub const CURRENT_SPACE: &str = "currentSpaceId";
}

/// Messages platform identity clients use when the user dismisses login.
pub mod cancellation {
    /// Native (iOS/Android) cancellation message.
    pub const NATIVE: &str = "The operation couldn\u{2019}t be completed";

    /// Browser popup cancellation message.
    pub const BROWSER: &str = "not authenticated popup window closed without navigating to result url";

    /// Every recognized cancellation message.
    pub const MESSAGES: [&str; 2] = [NATIVE, BROWSER];
}

/// Diagnostics tag names.
pub mod tags {
    /// Tag carrying the tenant id being resolved.
    pub const TENANT_ID: &str = "companyCode";

    /// Tag carrying the resolved API host.
    pub const API_HOST: &str = "apiHost";
}

/// Remote tenant config URL; `{tenant}` is replaced with the tenant id.
pub const DEFAULT_CONFIG_URL_TEMPLATE: &str = "https://{tenant}.workgrid.com/config/config.json";

/// Placeholder substituted in [`DEFAULT_CONFIG_URL_TEMPLATE`].
pub const TENANT_PLACEHOLDER: &str = "{tenant}";

/// Name of the identity-provider client entry in the tenant config.
pub const DEFAULT_CLIENT_KEY: &str = "workgridclient";

/// OAuth scope requested at login.
pub const DEFAULT_SCOPE: &str = "openid com.workgrid.api/userclient.all";

/// Redirect and logout URI for the web platform.
pub const DEFAULT_WEB_REDIRECT_URI: &str = "http://localhost:8100/login";

/// Redirect and logout URI for native platforms.
pub const DEFAULT_NATIVE_REDIRECT_URI: &str = "com.workgrid.client://login";

/// Breadcrumb message used when an unclassifiable state is reported.
pub const AUTH_STATE_BREADCRUMB: &str = "auth state";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_message_uses_typographic_apostrophe() {
        assert!(cancellation::NATIVE.contains('\u{2019}'));
        assert!(!cancellation::NATIVE.contains('\''));
    }

    #[test]
    fn test_url_template_has_placeholder() {
        assert!(DEFAULT_CONFIG_URL_TEMPLATE.contains(TENANT_PLACEHOLDER));
    }
}
