//! # GraceJWT API
//!
//! HTTP boundary layer: extracts the bearer credential, drives the token
//! lifecycle manager, and surfaces replacement tokens to clients via the
//! `Authorization` response header.

pub mod dto;
pub mod middleware;

pub use middleware::auth::{AuthContext, GraceAuth, OptionalAuth};
