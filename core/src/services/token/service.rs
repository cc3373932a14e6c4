//! Token lifecycle manager: issuance, validation, renewal and revocation

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::CacheStore;

use super::cache::ClaimsCache;
use super::codec::ClaimsCodec;
use super::config::TokenServiceConfig;
use super::grace::{GraceOutcome, GraceRegistry};
use super::revocation::RevocationStore;
use super::sweeper::{GraceSweeper, SweeperConfig};

/// Result of validating a presented token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The token authenticates the subject
    Accepted { subject: String },
    /// The token was expired but within its grace window for the first
    /// time: the request proceeds and the caller must adopt `replacement`
    RenewalOffered { subject: String, replacement: String },
    /// The token must not authenticate
    Rejected(RejectionReason),
}

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Present in the revocation store
    Revoked,
    /// Expired and past (or denied) its grace window
    Expired,
    /// Malformed or failed the signature check
    Invalid,
}

impl RejectionReason {
    /// Stable code for boundary-layer denial responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revoked => "revoked",
            Self::Expired => "expired",
            Self::Invalid => "invalid",
        }
    }
}

/// Orchestrates the token lifecycle components
///
/// Invoked concurrently by many request-handling tasks; the only shared
/// mutable state is the grace registry's record map, which serializes its
/// own access. The two cache stores must use distinct key namespaces.
pub struct TokenService {
    codec: Arc<ClaimsCodec>,
    revocations: Arc<RevocationStore>,
    claims_cache: ClaimsCache,
    grace: Arc<GraceRegistry>,
    config: TokenServiceConfig,
}

impl TokenService {
    /// Creates a token service over the two cache collaborator instances
    ///
    /// # Arguments
    ///
    /// * `config` - Static configuration for the lifetime of this instance
    /// * `revocation_store` - Cache namespace backing the blacklist
    /// * `claims_store` - Cache namespace backing the claims fast path
    pub fn new(
        config: TokenServiceConfig,
        revocation_store: Arc<dyn CacheStore>,
        claims_store: Arc<dyn CacheStore>,
    ) -> Self {
        let codec = Arc::new(ClaimsCodec::new(
            config.secret.as_bytes(),
            config.issuer.clone(),
        ));
        let revocations = Arc::new(RevocationStore::new(revocation_store));
        let grace = Arc::new(GraceRegistry::new(
            Arc::clone(&codec),
            Arc::clone(&revocations),
            Duration::seconds(config.grace_window_seconds),
            Duration::seconds(config.token_ttl_seconds),
        ));

        Self {
            codec,
            revocations,
            claims_cache: ClaimsCache::new(claims_store),
            grace,
            config,
        }
    }

    /// Issues a signed token for `subject` with the configured lifetime
    pub async fn issue(&self, subject: &str) -> DomainResult<String> {
        self.issue_with_ttl(subject, Duration::seconds(self.config.token_ttl_seconds))
            .await
    }

    /// Issues a signed token for `subject` with an explicit lifetime
    ///
    /// The claims-cache mirror is best-effort: issuance succeeds even when
    /// caching fails, with the failure reported at `warn!`.
    pub async fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> DomainResult<String> {
        let (token, claims) = self.codec.issue(subject, ttl)?;

        if let Err(err) = self.claims_cache.remember(&token, &claims).await {
            warn!("Issued token could not be mirrored into the claims cache: {err}");
        }

        Ok(token)
    }

    /// Validates a presented token
    ///
    /// Checks, in order: the revocation store, the claims-cache fast path,
    /// full signature verification, and (for expired tokens) the
    /// grace-period registry. Verification and revocation failures are
    /// classified into the returned outcome; only internal failures while
    /// minting a replacement surface as `Err`.
    pub async fn validate(&self, token: &str) -> DomainResult<ValidationOutcome> {
        // A revoked token never authenticates again, regardless of what its
        // signature or any cached claims say.
        if self.revocations.is_revoked(token).await {
            return Ok(ValidationOutcome::Rejected(RejectionReason::Revoked));
        }

        if let Some(claims) = self.claims_cache.lookup(token).await {
            return Ok(ValidationOutcome::Accepted { subject: claims.sub });
        }

        match self.codec.verify(token) {
            Ok(claims) => {
                // Opportunistic cache refresh for the next lookup.
                if let Err(err) = self.claims_cache.remember(token, &claims).await {
                    debug!("Claims cache refresh failed: {err}");
                }
                Ok(ValidationOutcome::Accepted { subject: claims.sub })
            }
            Err(TokenError::TokenExpired) => self.handle_expired(token).await,
            Err(_) => Ok(ValidationOutcome::Rejected(RejectionReason::Invalid)),
        }
    }

    /// Routes an expired token through the grace-period registry
    async fn handle_expired(&self, token: &str) -> DomainResult<ValidationOutcome> {
        let claims = match self.codec.verify_ignoring_expiry(token) {
            Ok(claims) => claims,
            Err(_) => return Ok(ValidationOutcome::Rejected(RejectionReason::Invalid)),
        };

        match self.grace.handle_expired_use(token, &claims).await? {
            GraceOutcome::Renewed {
                replacement,
                replacement_claims,
            } => {
                if let Err(err) = self
                    .claims_cache
                    .remember(&replacement, &replacement_claims)
                    .await
                {
                    warn!("Replacement token could not be mirrored into the claims cache: {err}");
                }
                Ok(ValidationOutcome::RenewalOffered {
                    subject: claims.sub,
                    replacement,
                })
            }
            GraceOutcome::Admitted => Ok(ValidationOutcome::Accepted { subject: claims.sub }),
            GraceOutcome::Rejected => Ok(ValidationOutcome::Rejected(RejectionReason::Expired)),
        }
    }

    /// Revokes `token`, whether or not it has already expired
    ///
    /// A token that cannot even be parsed (or fails the signature check)
    /// is an error; an expired-but-well-signed token revokes successfully
    /// with the blacklist TTL floor applied.
    pub async fn revoke(&self, token: &str) -> DomainResult<()> {
        let claims = self
            .codec
            .verify_ignoring_expiry(token)
            .map_err(DomainError::Token)?;

        self.revocations
            .revoke(token, claims.expires_at())
            .await
            .map_err(DomainError::Cache)
    }

    /// Direct revocation check, bypassing validation
    pub async fn is_revoked(&self, token: &str) -> bool {
        self.revocations.is_revoked(token).await
    }

    /// Recovers the claims embedded in `token` without requiring it to be
    /// time-valid; rejects bad signatures
    pub fn peek_claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.codec.verify_ignoring_expiry(token)
    }

    /// The grace registry backing this service
    pub fn grace_registry(&self) -> &Arc<GraceRegistry> {
        &self.grace
    }

    /// Starts the periodic reclamation sweep as a background task
    ///
    /// Must be called from within a tokio runtime. A non-positive
    /// configured interval disables the sweep.
    pub fn start_background_sweep(&self) {
        let sweeper = Arc::new(GraceSweeper::new(
            Arc::clone(&self.grace),
            SweeperConfig {
                interval_seconds: self.config.sweep_interval_seconds,
            },
        ));
        sweeper.start_background_task();
    }
}
