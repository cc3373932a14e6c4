//! Grace period registry: pending-renewal state for expired tokens
//!
//! An expired but well-signed token may authenticate for a bounded window
//! after expiry. The first expired use mints a replacement token and opens
//! a pending record; later uses of the same token are admitted until the
//! record's absolute deadline passes, at which point the token is revoked.
//! The registry map is the only lock-guarded shared state in the system.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::token::Claims;
use crate::errors::DomainResult;

use super::codec::ClaimsCodec;
use super::revocation::RevocationStore;

/// Safety margin added past the deadline before the one-shot reclamation
/// fires, so a request racing the deadline still observes the record
const RECLAIM_MARGIN_SECONDS: i64 = 1;

/// Pending-renewal record for one expired token
struct GraceRecord {
    /// Absolute deadline: record creation time plus the grace window
    deadline: DateTime<Utc>,
    /// Replacement token minted on the first expired use
    replacement: String,
    /// Expiry of the original token, for the revocation TTL
    original_expiry: Option<DateTime<Utc>>,
}

/// Outcome of presenting an expired token to the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraceOutcome {
    /// First expired use within the window: the request proceeds and the
    /// caller must adopt the freshly minted replacement token
    Renewed {
        replacement: String,
        replacement_claims: Claims,
    },
    /// Subsequent use within the window: the request proceeds as the
    /// original subject; no replacement is re-issued or re-announced
    Admitted,
    /// The window has elapsed (or grace is disabled); the token is revoked
    Rejected,
}

/// In-memory registry of pending grace-period records
///
/// Creation-or-lookup is a check-then-act sequence, so all access happens
/// under one mutex: two concurrent requests presenting the same expired
/// token must not both mint replacements.
pub struct GraceRegistry {
    records: Mutex<HashMap<String, GraceRecord>>,
    /// Grace window; zero or negative means "no grace"
    window: Duration,
    /// Lifetime for replacement tokens (normal issuance rules)
    replacement_ttl: Duration,
    codec: Arc<ClaimsCodec>,
    revocations: Arc<RevocationStore>,
}

impl GraceRegistry {
    pub fn new(
        codec: Arc<ClaimsCodec>,
        revocations: Arc<RevocationStore>,
        window: Duration,
        replacement_ttl: Duration,
    ) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            window,
            replacement_ttl,
            codec,
            revocations,
        }
    }

    /// Runs the grace-period state machine for one expired use of `token`
    ///
    /// `claims` must come from `ClaimsCodec::verify_ignoring_expiry`, i.e.
    /// the signature has already been checked. The lookup, the deadline
    /// comparison and any record mutation happen while the registry lock is
    /// held; exactly one of any number of concurrent first uses creates the
    /// record.
    pub async fn handle_expired_use(
        self: &Arc<Self>,
        token: &str,
        claims: &Claims,
    ) -> DomainResult<GraceOutcome> {
        if self.window <= Duration::zero() {
            // No grace: reject immediately and revoke, without ever
            // creating a record.
            if let Err(err) = self.revocations.revoke(token, claims.expires_at()).await {
                warn!("Failed to revoke expired token: {err}");
            }
            return Ok(GraceOutcome::Rejected);
        }

        let now = Utc::now();
        let mut records = self.records.lock().await;

        if let Some(record) = records.get(token) {
            if now > record.deadline {
                // Window elapsed: revoke first, and only drop the record
                // once the blacklist write succeeded so the sweeper can
                // retry a failed revocation.
                match self.revocations.revoke(token, record.original_expiry).await {
                    Ok(()) => {
                        records.remove(token);
                    }
                    Err(err) => {
                        warn!("Failed to revoke token past its grace deadline: {err}");
                    }
                }
                return Ok(GraceOutcome::Rejected);
            }
            return Ok(GraceOutcome::Admitted);
        }

        // First observed expired use: mint a replacement for the recovered
        // subject and open the pending record.
        let (replacement, replacement_claims) =
            self.codec.issue(&claims.sub, self.replacement_ttl)?;
        let deadline = now + self.window;
        records.insert(
            token.to_string(),
            GraceRecord {
                deadline,
                replacement: replacement.clone(),
                original_expiry: claims.expires_at(),
            },
        );
        drop(records);

        debug!(subject = %claims.sub, %deadline, "Opened grace period record");
        self.schedule_reclaim(token.to_string(), deadline);

        Ok(GraceOutcome::Renewed {
            replacement,
            replacement_claims,
        })
    }

    /// Spawns the one-shot deferred reclamation for a freshly created record
    ///
    /// Fires slightly after the deadline as a safety net; the periodic
    /// sweep remains the backstop if this task is ever lost.
    fn schedule_reclaim(self: &Arc<Self>, token: String, deadline: DateTime<Utc>) {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let wait = deadline - Utc::now() + Duration::seconds(RECLAIM_MARGIN_SECONDS);
            if let Ok(wait) = wait.to_std() {
                tokio::time::sleep(wait).await;
            }
            registry.reclaim(&token).await;
        });
    }

    /// Removes and revokes `token`'s record if its deadline has passed
    ///
    /// No-op when the record was already removed by a request-triggered
    /// reject or by the periodic sweep. Returns whether a record was
    /// reclaimed.
    pub async fn reclaim(&self, token: &str) -> bool {
        let mut records = self.records.lock().await;

        let Some(record) = records.get(token) else {
            return false;
        };
        if Utc::now() <= record.deadline {
            return false;
        }

        match self.revocations.revoke(token, record.original_expiry).await {
            Ok(()) => {
                records.remove(token);
                debug!("Reclaimed grace period record");
                true
            }
            Err(err) => {
                warn!("Failed to revoke token during reclamation, will retry: {err}");
                false
            }
        }
    }

    /// Sweeps every record whose stored absolute deadline has passed
    ///
    /// Returns `(reclaimed, failed)`; failed revocations keep their record
    /// and are retried on the next sweep.
    pub async fn sweep(&self) -> (usize, usize) {
        let mut records = self.records.lock().await;
        let now = Utc::now();

        let stale: Vec<String> = records
            .iter()
            .filter(|(_, record)| now > record.deadline)
            .map(|(token, _)| token.clone())
            .collect();

        let mut reclaimed = 0;
        let mut failed = 0;
        for token in stale {
            let original_expiry = records.get(&token).and_then(|r| r.original_expiry);
            match self.revocations.revoke(&token, original_expiry).await {
                Ok(()) => {
                    records.remove(&token);
                    reclaimed += 1;
                }
                Err(err) => {
                    warn!("Failed to revoke token during sweep, will retry: {err}");
                    failed += 1;
                }
            }
        }

        (reclaimed, failed)
    }

    /// Number of pending records currently held
    pub async fn pending_count(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether a pending record exists for `token`
    pub async fn is_pending(&self, token: &str) -> bool {
        self.records.lock().await.contains_key(token)
    }

    /// The replacement token recorded for `token`, if a record is pending
    pub async fn pending_replacement(&self, token: &str) -> Option<String> {
        self.records
            .lock()
            .await
            .get(token)
            .map(|record| record.replacement.clone())
    }
}
