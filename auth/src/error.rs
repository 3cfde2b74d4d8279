//! Error types for tenant resolution and identity session operations.

use crate::constants::cancellation;
use tenant_session_runtime::StoreError;
use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Error taxonomy for the session layer.
///
/// Errors are `Clone + PartialEq` so captured exceptions can be recorded by
/// diagnostics sinks and compared in tests.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    // ═══════════════════════════════════════════════════════════
    // Storage & Network
    // ═══════════════════════════════════════════════════════════

    /// Durable key-value store operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Transport failure while talking to a remote service.
    #[error("Network error: {0}")]
    Network(String),

    /// Remote config endpoint answered with a non-success status.
    #[error("Config request failed with status {status}")]
    ConfigRequestFailed {
        /// HTTP status code
        status: u16,
    },

    /// A stored or downloaded document could not be decoded.
    #[error("Malformed config document: {0}")]
    MalformedConfig(String),

    // ═══════════════════════════════════════════════════════════
    // Tenant Configuration
    // ═══════════════════════════════════════════════════════════

    /// Tenant config lacks the identity-provider details a session needs.
    #[error("Invalid tenant config: {0}")]
    InvalidTenantConfig(String),

    /// Platform name not recognized.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    // ═══════════════════════════════════════════════════════════
    // Identity Session
    // ═══════════════════════════════════════════════════════════

    /// The user dismissed the login flow.
    #[error("Login cancelled by user")]
    UserCancelled,

    /// The identity-provider client reported a failure.
    #[error("Identity provider error: {0}")]
    Adapter(String),

    /// An operation needed a session adapter before tenant config resolved.
    #[error("No session adapter: tenant config has not been resolved")]
    NoSessionAdapter,

    /// Authenticated-only surface used while not authenticated.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// State flags matched no known view.
    #[error("Unknown authentication state")]
    UnknownAuthenticationState,

    // ═══════════════════════════════════════════════════════════
    // Runtime
    // ═══════════════════════════════════════════════════════════

    /// The underlying store rejected or timed out an operation.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Classify a message coming from a platform identity client.
    ///
    /// The recognized dismissal messages become [`SessionError::UserCancelled`];
    /// anything else is kept as [`SessionError::Adapter`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use tenant_session_auth::SessionError;
    /// let error = SessionError::from_platform_message(
    ///     "not authenticated popup window closed without navigating to result url",
    /// );
    /// assert_eq!(error, SessionError::UserCancelled);
    /// ```
    #[must_use]
    pub fn from_platform_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if cancellation::MESSAGES.contains(&message.as_str()) {
            Self::UserCancelled
        } else {
            Self::Adapter(message)
        }
    }

    /// Returns `true` if this error means the user dismissed login.
    ///
    /// Matching is exact and case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tenant_session_auth::SessionError;
    /// assert!(SessionError::UserCancelled.is_user_cancellation());
    /// assert!(!SessionError::Adapter("boom".into()).is_user_cancellation());
    /// ```
    #[must_use]
    pub fn is_user_cancellation(&self) -> bool {
        match self {
            Self::UserCancelled => true,
            Self::Adapter(message) => cancellation::MESSAGES.contains(&message.as_str()),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => Self::ConfigRequestFailed {
                status: status.as_u16(),
            },
            None if error.is_decode() => Self::MalformedConfig(error.to_string()),
            None => Self::Network(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedConfig(error.to_string())
    }
}
