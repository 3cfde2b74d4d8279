//! Recording diagnostics sink.

use super::lock;
use crate::error::SessionError;
use crate::providers::DiagnosticsSink;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Something reported to a diagnostics sink.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// A breadcrumb.
    Breadcrumb {
        /// Breadcrumb message.
        message: String,
        /// Attached payload.
        data: Option<Value>,
    },

    /// A captured exception.
    Exception(SessionError),

    /// A tag update.
    Tag {
        /// Tag name.
        key: String,
        /// Tag value.
        value: String,
    },
}

/// Diagnostics sink that records every event in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    events: Arc<Mutex<Vec<DiagnosticEvent>>>,
}

impl RecordingDiagnostics {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event, in order.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        lock(&self.events).clone()
    }

    /// Breadcrumb messages, in order.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                DiagnosticEvent::Breadcrumb { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Captured exceptions, in order.
    #[must_use]
    pub fn exceptions(&self) -> Vec<SessionError> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                DiagnosticEvent::Exception(error) => Some(error.clone()),
                _ => None,
            })
            .collect()
    }

    /// Latest value of tag `key`.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<String> {
        lock(&self.events).iter().rev().find_map(|event| match event {
            DiagnosticEvent::Tag { key: k, value } if k == key => Some(value.clone()),
            _ => None,
        })
    }

    /// How many breadcrumbs carry `message`.
    #[must_use]
    pub fn breadcrumb_count(&self, message: &str) -> usize {
        self.breadcrumbs().iter().filter(|m| *m == message).count()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn record_breadcrumb(&self, message: &str, data: Option<Value>) {
        lock(&self.events).push(DiagnosticEvent::Breadcrumb {
            message: message.to_string(),
            data,
        });
    }

    fn record_exception(&self, error: &SessionError) {
        lock(&self.events).push(DiagnosticEvent::Exception(error.clone()));
    }

    fn set_tag(&self, key: &str, value: &str) {
        lock(&self.events).push(DiagnosticEvent::Tag {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
}
