//! Token lifecycle module
//!
//! This module handles every stage of a bearer token's life:
//! - JWT issuance and signature verification
//! - Revocation via a TTL'd blacklist
//! - A claims cache fast path that skips signature re-verification
//! - The grace-period registry that lets an expired token authenticate for
//!   a bounded window while handing its caller a replacement
//! - Background reclamation of stale grace-period records

mod cache;
mod codec;
mod config;
mod grace;
mod revocation;
mod service;
mod sweeper;

#[cfg(test)]
mod tests;

pub use cache::ClaimsCache;
pub use codec::ClaimsCodec;
pub use config::TokenServiceConfig;
pub use grace::{GraceOutcome, GraceRegistry};
pub use revocation::RevocationStore;
pub use service::{RejectionReason, TokenService, ValidationOutcome};
pub use sweeper::{GraceSweeper, SweepReport, SweeperConfig};
