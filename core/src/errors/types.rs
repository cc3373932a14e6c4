//! Error type definitions for token and cache operations
//!
//! Verification failures are classified into a small taxonomy so the
//! lifecycle manager can route recoverable failures (expiry) through the
//! grace-period path while treating everything else as opaque.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature is valid but the token has passed its expiry. Recoverable:
    /// triggers grace-period evaluation rather than an immediate denial.
    #[error("Token expired")]
    TokenExpired,

    /// Structurally unparseable token. Fatal, no claims are exposed.
    #[error("Invalid token format")]
    InvalidTokenFormat,

    /// Cryptographic signature check failed. Fatal, treated as a possible
    /// attack; no claims are exposed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Token is present in the revocation store.
    #[error("Token revoked")]
    TokenRevoked,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Errors raised by the cache collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache backend error: {message}")]
    Backend { message: String },

    #[error("Cache entry could not be decoded: {message}")]
    Decode { message: String },

    #[error("Cache store is closed")]
    Closed,
}

impl CacheError {
    /// Convenience constructor for backend failures
    pub fn backend(message: impl ToString) -> Self {
        Self::Backend {
            message: message.to_string(),
        }
    }
}
