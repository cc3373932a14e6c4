//! Claims cache: fast-path storage of decoded claims per token string

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::domain::entities::token::Claims;
use crate::errors::CacheError;
use crate::repositories::CacheStore;

const FIELD_SUBJECT: &str = "subject";
const FIELD_ISSUER: &str = "issuer";
const FIELD_ISSUED_AT: &str = "issued_at";
const FIELD_EXPIRES_AT: &str = "expires_at";

/// Mapping from an active token string to its decoded claims
///
/// Purely an optimization: a hit avoids re-verifying the signature, a miss
/// (or any storage failure) falls through to full verification.
pub struct ClaimsCache {
    store: Arc<dyn CacheStore>,
}

impl ClaimsCache {
    /// Creates a claims cache over its own cache namespace
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Stores `claims` under `token` until the claims expire
    ///
    /// Already-expired claims are skipped. Failures must not block token
    /// issuance; callers log and continue.
    pub async fn remember(&self, token: &str, claims: &Claims) -> Result<(), CacheError> {
        let remaining = claims.exp - Utc::now().timestamp();
        if remaining <= 0 {
            return Ok(());
        }

        let fields = HashMap::from([
            (FIELD_SUBJECT.to_string(), claims.sub.clone()),
            (FIELD_ISSUER.to_string(), claims.iss.clone()),
            (FIELD_ISSUED_AT.to_string(), claims.iat.to_string()),
            (FIELD_EXPIRES_AT.to_string(), claims.exp.to_string()),
        ]);

        self.store
            .set_hash(token, &fields, Duration::from_secs(remaining as u64))
            .await
    }

    /// Looks up cached claims for `token`
    ///
    /// Returns `None` on a miss, on a hit whose expiry has already passed,
    /// or on any storage or decoding failure; all of these behave exactly
    /// like a miss and fall through to full verification.
    pub async fn lookup(&self, token: &str) -> Option<Claims> {
        let fields = match self.store.get_hash(token).await {
            Ok(Some(fields)) => fields,
            Ok(None) => return None,
            Err(err) => {
                debug!("Claims cache lookup failed, falling through to verification: {err}");
                return None;
            }
        };

        let claims = decode_fields(&fields)?;
        if claims.is_expired() {
            return None;
        }
        Some(claims)
    }
}

/// Rebuilds `Claims` from cached hash fields; `None` if any field is
/// missing or unparseable
fn decode_fields(fields: &HashMap<String, String>) -> Option<Claims> {
    Some(Claims {
        sub: fields.get(FIELD_SUBJECT)?.clone(),
        iss: fields.get(FIELD_ISSUER)?.clone(),
        iat: fields.get(FIELD_ISSUED_AT)?.parse().ok()?,
        exp: fields.get(FIELD_EXPIRES_AT)?.parse().ok()?,
    })
}
