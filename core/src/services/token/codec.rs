//! Claims codec: signing and verifying the JWT credential payload

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, DomainResult, TokenError};

/// Serializes, signs and verifies `Claims` against a configured symmetric key
///
/// The codec is pure computation: callers decide whether to cache the
/// result. A single fixed algorithm (HS256) is used; algorithm negotiation
/// is out of scope.
pub struct ClaimsCodec {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validation_ignoring_expiry: Validation,
}

impl ClaimsCodec {
    /// Creates a codec for the given secret and issuer
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&issuer]);
        validation.validate_exp = true;
        // Tokens must expire exactly at `exp`; clock skew is handled by the
        // grace window, not by verification leeway.
        validation.leeway = 0;

        let mut validation_ignoring_expiry = validation.clone();
        validation_ignoring_expiry.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer,
            validation,
            validation_ignoring_expiry,
        }
    }

    /// The issuer this codec signs for
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Builds and signs claims for `subject` expiring `ttl` from now
    ///
    /// Returns the signed token together with the claims that were embedded
    /// in it, so callers can mirror them into the claims cache without
    /// re-verifying their own signature.
    pub fn issue(&self, subject: &str, ttl: Duration) -> DomainResult<(String, Claims)> {
        let claims = Claims::new(subject, self.issuer.clone(), ttl);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;
        Ok((token, claims))
    }

    /// Verifies signature and expiry, returning the decoded claims
    ///
    /// Expiry of a well-signed token fails specifically with
    /// `TokenError::TokenExpired` so the caller can route the token through
    /// the grace-period path. All other failures are opaque and never
    /// expose claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }

    /// Verifies signature only, recovering claims from an expired token
    ///
    /// Used exclusively by the grace-period path to recover the subject of
    /// an already-expired token. Tokens failing the signature check are
    /// still rejected.
    pub fn verify_ignoring_expiry(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation_ignoring_expiry)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }
}

/// Classifies a jsonwebtoken decode error into the token error taxonomy
fn map_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::InvalidTokenFormat,
    }
}
