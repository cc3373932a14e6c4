//! Revocation store: the TTL'd token blacklist

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::errors::CacheError;
use crate::repositories::CacheStore;

/// Minimum blacklist TTL; very-soon-to-expire tokens would otherwise be
/// effectively unrevoked before they expired on their own
const MIN_REVOCATION_TTL_SECONDS: u64 = 60;

/// Conservative blacklist TTL when no expiry is known for the token
const DEFAULT_REVOCATION_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Marker value stored under a revoked token string
const REVOKED_MARKER: &str = "1";

/// Durable set of revoked token strings with per-entry TTLs
///
/// A token present in this store must never again authenticate, regardless
/// of what its signature says. Entries are never explicitly deleted; the
/// backing store's own expiry evicts them.
pub struct RevocationStore {
    store: Arc<dyn CacheStore>,
}

impl RevocationStore {
    /// Creates a revocation store over its own cache namespace
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Marks `token` as revoked
    ///
    /// The TTL tracks the token's remaining validity, floored at one
    /// minute; with no known expiry a conservative 24 hours applies.
    /// Idempotent: revoking an already-revoked token overwrites the entry.
    pub async fn revoke(
        &self,
        token: &str,
        known_expiry: Option<DateTime<Utc>>,
    ) -> Result<(), CacheError> {
        let ttl = match known_expiry {
            Some(expires_at) => {
                let remaining = (expires_at - Utc::now()).num_seconds();
                Duration::from_secs((remaining.max(0) as u64).max(MIN_REVOCATION_TTL_SECONDS))
            }
            None => Duration::from_secs(DEFAULT_REVOCATION_TTL_SECONDS),
        };

        self.store.set(token, REVOKED_MARKER, ttl).await
    }

    /// Checks whether `token` has been revoked
    ///
    /// Fails open: a storage error is treated as "not revoked" so an outage
    /// of the blacklist backend does not lock out all traffic.
    pub async fn is_revoked(&self, token: &str) -> bool {
        match self.store.exists(token).await {
            Ok(exists) => exists,
            Err(err) => {
                warn!("Revocation check failed, treating token as not revoked: {err}");
                false
            }
        }
    }
}
