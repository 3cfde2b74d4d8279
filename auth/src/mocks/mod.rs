//! Mock provider implementations for testing.
//!
//! This module provides scripted, in-memory implementations of all provider
//! traits for use in unit and integration tests. Every mock is a cheap
//! handle over shared state, so a test can keep a clone to inspect calls
//! after handing another clone to the environment.

pub mod diagnostics;
pub mod session;
pub mod storage;
pub mod tenant;

pub use diagnostics::{DiagnosticEvent, RecordingDiagnostics};
pub use session::{MockAdapterFactory, MockExternalReset, MockSessionAdapter};
pub use storage::MockKeyValueStore;
pub use tenant::{MockTenantConfigSource, MockTenantIdStore};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock shared mock state, recovering from poisoning caused by a failed test.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
