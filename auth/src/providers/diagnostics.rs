//! Diagnostics sink trait.

use crate::error::SessionError;
use serde_json::Value;

/// Receives breadcrumbs, captured exceptions and tags.
///
/// Recording never fails and never influences control flow, so the methods
/// are synchronous and infallible.
pub trait DiagnosticsSink: Send + Sync {
    /// Record a lightweight trail entry.
    fn record_breadcrumb(&self, message: &str, data: Option<Value>);

    /// Record an unexpected error.
    fn record_exception(&self, error: &SessionError);

    /// Attach a key/value tag to subsequent reports.
    fn set_tag(&self, key: &str, value: &str);
}
