//! # GraceJWT Core
//!
//! Core token lifecycle logic for GraceJWT. This crate contains the claims
//! codec, revocation store, claims cache, grace period registry, reclamation
//! sweeper, and the orchestrating token service, along with the cache
//! collaborator interface implemented by the infrastructure layer.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
