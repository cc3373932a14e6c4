//! Cache store implementations and backend selection

pub mod memory;
pub mod redis_store;

#[cfg(test)]
mod tests;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use std::sync::Arc;

use tracing::warn;

use gj_core::repositories::CacheStore;

use crate::config::{CacheBackend, CacheConfig};

/// Builds a cache store for `namespace` per the configured backend
///
/// The Redis backend degrades gracefully: if the connection cannot be
/// established the embedded memory store is used instead of failing
/// startup.
pub async fn connect_store(config: &CacheConfig, namespace: &str) -> Arc<dyn CacheStore> {
    match config.backend {
        CacheBackend::Memory => Arc::new(MemoryStore::new()),
        CacheBackend::Redis => match RedisStore::connect(config, namespace).await {
            Ok(store) => Arc::new(store),
            Err(err) => {
                warn!(
                    "Redis cache initialization failed ({err}), \
                     falling back to the embedded memory store"
                );
                Arc::new(MemoryStore::new())
            }
        },
    }
}
