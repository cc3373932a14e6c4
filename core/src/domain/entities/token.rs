//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Default token lifetime (30 minutes)
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 30 * 60;

/// Default JWT issuer
pub const DEFAULT_ISSUER: &str = "grace-jwt";

/// Claims structure for the signed JWT payload
///
/// Intentionally carries no `jti`: a token string is identified by its
/// subject plus issued-at second, and every cache and registry in the
/// system is keyed by the full signed token string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (opaque user identifier)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at timestamp (Unix seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring `ttl` from now
    ///
    /// A zero or negative `ttl` produces claims that are already expired,
    /// which is valid input for the grace-period paths.
    pub fn new(subject: impl Into<String>, issuer: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.into(),
            iss: issuer.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks whether the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Expiration as a `DateTime<Utc>`
    ///
    /// Returns `None` for a timestamp outside the representable range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Remaining validity from now; negative once expired
    pub fn remaining_validity(&self) -> Duration {
        Duration::seconds(self.exp - Utc::now().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_claims_are_valid() {
        let claims = Claims::new("42", DEFAULT_ISSUER, Duration::seconds(60));
        assert!(!claims.is_expired());
        assert!(claims.remaining_validity() > Duration::seconds(50));
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, DEFAULT_ISSUER);
    }

    #[test]
    fn test_negative_ttl_is_expired() {
        let claims = Claims::new("42", DEFAULT_ISSUER, Duration::seconds(-1));
        assert!(claims.is_expired());
        assert!(claims.remaining_validity() <= Duration::zero());
    }

    #[test]
    fn test_expires_at_round_trips() {
        let claims = Claims::new("42", DEFAULT_ISSUER, Duration::seconds(120));
        let exp = claims.expires_at().expect("representable timestamp");
        assert_eq!(exp.timestamp(), claims.exp);
    }
}
