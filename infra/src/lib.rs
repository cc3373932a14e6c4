//! # GraceJWT Infrastructure
//!
//! Cache backend implementations for the token lifecycle core: an embedded
//! in-memory store and a Redis store, selected (with fallback) at
//! construction time.

pub mod cache;
pub mod config;

use std::sync::Arc;

use thiserror::Error;

use gj_core::services::token::{TokenService, TokenServiceConfig};

use crate::config::CacheConfig;

/// Infrastructure layer errors
#[derive(Error, Debug)]
pub enum InfrastructureError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),
}

/// Cache namespace for the revocation blacklist
pub const BLACKLIST_NAMESPACE: &str = "blacklist";

/// Cache namespace for the token-claims fast path
pub const TOKEN_NAMESPACE: &str = "token";

/// Builds a fully wired `TokenService` over the configured cache backend
///
/// Connects two independently namespaced store instances (blacklist and
/// token claims) and starts the periodic reclamation sweep, so stale
/// grace-period records are cleaned up even without further traffic. A
/// non-positive sweep interval in `token_config` leaves the sweep off. A
/// Redis backend that fails to initialize falls back to the embedded
/// memory store rather than failing startup.
pub async fn build_token_service(
    token_config: TokenServiceConfig,
    cache_config: &CacheConfig,
) -> TokenService {
    let blacklist = cache::connect_store(cache_config, BLACKLIST_NAMESPACE).await;
    let token_cache = cache::connect_store(cache_config, TOKEN_NAMESPACE).await;
    let service = TokenService::new(token_config, blacklist, token_cache);
    service.start_background_sweep();
    service
}

/// Convenience alias for sharing a built service across handlers
pub type SharedTokenService = Arc<TokenService>;
