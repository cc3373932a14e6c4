//! Data transfer objects for the HTTP boundary

pub mod error;

pub use error::ErrorResponse;
