//! Production diagnostics sink.
//!
//! [`TracingDiagnostics`] keeps a bounded breadcrumb trail and the current
//! tags in memory and mirrors everything to `tracing`: breadcrumbs at debug,
//! captured exceptions at error together with the tags and trail length.
//! Install a `tracing` subscriber to forward them to an error-tracking
//! backend.

use crate::error::SessionError;
use crate::providers::DiagnosticsSink;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tenant_session_core::environment::Clock;

/// One recorded breadcrumb.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breadcrumb {
    /// When the breadcrumb was recorded.
    pub timestamp: DateTime<Utc>,
    /// Breadcrumb message (an action name for reducer breadcrumbs).
    pub message: String,
    /// Attached payload.
    pub data: Option<Value>,
}

#[derive(Debug, Default)]
struct Trail {
    breadcrumbs: VecDeque<Breadcrumb>,
    tags: BTreeMap<String, String>,
}

/// Diagnostics sink backed by `tracing`.
///
/// Clones share the same trail.
#[derive(Debug, Clone)]
pub struct TracingDiagnostics<C> {
    clock: C,
    capacity: usize,
    trail: Arc<Mutex<Trail>>,
}

impl<C: Clock> TracingDiagnostics<C> {
    /// Create a sink keeping at most `capacity` breadcrumbs.
    #[must_use]
    pub fn new(clock: C, capacity: usize) -> Self {
        Self {
            clock,
            capacity: capacity.max(1),
            trail: Arc::new(Mutex::new(Trail::default())),
        }
    }

    /// Breadcrumbs currently retained, oldest first.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.lock().breadcrumbs.iter().cloned().collect()
    }

    /// Current tags.
    #[must_use]
    pub fn tags(&self) -> BTreeMap<String, String> {
        self.lock().tags.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Trail> {
        self.trail.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> DiagnosticsSink for TracingDiagnostics<C> {
    fn record_breadcrumb(&self, message: &str, data: Option<Value>) {
        tracing::debug!(breadcrumb = message, data = ?data, "Breadcrumb");

        let breadcrumb = Breadcrumb {
            timestamp: self.clock.now(),
            message: message.to_string(),
            data,
        };

        let mut trail = self.lock();
        if trail.breadcrumbs.len() >= self.capacity {
            trail.breadcrumbs.pop_front();
        }
        trail.breadcrumbs.push_back(breadcrumb);
    }

    fn record_exception(&self, error: &SessionError) {
        let trail = self.lock();
        tracing::error!(
            error = %error,
            tags = ?trail.tags,
            breadcrumbs = trail.breadcrumbs.len(),
            last_breadcrumb = trail.breadcrumbs.back().map(|b| b.message.as_str()),
            "Captured exception"
        );
    }

    fn set_tag(&self, key: &str, value: &str) {
        tracing::debug!(key, value, "Diagnostics tag set");
        self.lock().tags.insert(key.to_string(), value.to_string());
    }
}
