//! Configuration for the token service

/// Configuration for the token service
///
/// All fields are static for the lifetime of a `TokenService` instance.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret (symmetric, HS256)
    pub secret: String,
    /// Issuer embedded in and required of every token
    pub issuer: String,
    /// Default token lifetime in seconds
    pub token_ttl_seconds: i64,
    /// Grace window after expiry in seconds; zero or negative disables
    /// grace handling entirely
    pub grace_window_seconds: i64,
    /// Periodic sweep interval in seconds; zero or negative disables the
    /// sweep (per-record one-shot reclamation still runs)
    pub sweep_interval_seconds: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-please-change-in-production".to_string(),
            issuer: crate::domain::entities::token::DEFAULT_ISSUER.to_string(),
            token_ttl_seconds: crate::domain::entities::token::DEFAULT_TOKEN_TTL_SECONDS,
            grace_window_seconds: 30,
            sweep_interval_seconds: 60,
        }
    }
}
