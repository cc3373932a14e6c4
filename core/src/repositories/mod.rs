//! Repository interfaces implemented by the infrastructure layer

pub mod cache_store;

pub use cache_store::CacheStore;
