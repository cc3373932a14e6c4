//! Cache collaborator trait consumed by the revocation store and claims cache.
//!
//! The token lifecycle manager needs two independent instances of this
//! interface with distinct key namespaces: one for the revocation blacklist
//! and one for the token-claims fast path. Implementations live in the
//! infrastructure layer (embedded memory map or Redis).

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CacheError;

/// Narrow key-value/cache interface with per-entry TTLs
///
/// Every operation is a single-key access and is assumed atomic at the
/// storage layer; no additional application-level locking is required on
/// top of an implementation.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Store a string value under `key` for at least `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Fetch the value stored under `key`, or `None` on a miss
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Check whether `key` currently exists
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Store a field map under `key` for at least `ttl`
    async fn set_hash(
        &self,
        key: &str,
        fields: &HashMap<String, String>,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Fetch the field map stored under `key`, or `None` on a miss
    async fn get_hash(&self, key: &str) -> Result<Option<HashMap<String, String>>, CacheError>;

    /// Release any resources held by the store
    async fn close(&self) -> Result<(), CacheError>;
}
