//! Durable key-value store trait.

use crate::error::Result;
use std::future::Future;

/// Durable string key-value store.
///
/// Values survive process restarts. Independent resolvers use disjoint keys
/// (see [`crate::constants::storage_keys`]); no cross-key transactions are
/// assumed.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be read.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;

    /// Remove a value. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// List stored keys in ascending order.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be read.
    fn keys(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Remove every value.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn clear(&self) -> impl Future<Output = Result<()>> + Send;
}
