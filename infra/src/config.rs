//! Cache backend configuration

use serde::{Deserialize, Serialize};

/// Which cache backend to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Embedded in-memory map
    Memory,
    /// Networked Redis instance (falls back to memory on connect failure)
    Redis,
}

/// Cache collaborator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Backend selection
    pub backend: CacheBackend,

    /// Redis connection URL
    pub url: String,

    /// Redis database number (0-15)
    #[serde(default)]
    pub database: u8,

    /// Prefix applied to every cache key
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Maximum connect attempts before giving up on Redis
    #[serde(default = "default_max_retries")]
    pub max_connect_retries: u32,
}

fn default_max_retries() -> u32 {
    3
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            url: String::from("redis://localhost:6379"),
            database: 0,
            key_prefix: None,
            max_connect_retries: default_max_retries(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    ///
    /// `CACHE_BACKEND` selects `memory` (default) or `redis`; `REDIS_URL`,
    /// `REDIS_DATABASE` and `CACHE_KEY_PREFIX` fill in the rest.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let backend = match std::env::var("CACHE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "redis" => CacheBackend::Redis,
            _ => CacheBackend::Memory,
        };
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let database = std::env::var("REDIS_DATABASE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(0);
        let key_prefix = std::env::var("CACHE_KEY_PREFIX").ok();

        Self {
            backend,
            url,
            database,
            key_prefix,
            max_connect_retries: default_max_retries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_is_memory() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.database, 0);
        assert!(config.key_prefix.is_none());
    }
}
