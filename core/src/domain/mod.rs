//! Domain layer: entities shared across services

pub mod entities;

pub use entities::*;
