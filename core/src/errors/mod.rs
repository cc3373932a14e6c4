//! Error types for the GraceJWT core
//!
//! `DomainError` is the umbrella error returned by public service APIs;
//! `TokenError` and `CacheError` carry the specific classification.

mod types;

pub use types::{CacheError, TokenError};

use thiserror::Error;

/// Unified error type for the core layer
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result alias used throughout the core layer
pub type DomainResult<T> = Result<T, DomainError>;
