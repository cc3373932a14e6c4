//! Embedded in-memory cache store
//!
//! Default backend, and the fallback when Redis fails to initialize. Every
//! entry carries an absolute expiry; expired entries are evicted lazily on
//! access and opportunistically when new entries are written.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use gj_core::errors::CacheError;
use gj_core::repositories::CacheStore;

enum Value {
    Text(String),
    Hash(HashMap<String, String>),
}

struct Entry {
    value: Value,
    expires_at: Instant,
}

impl Entry {
    fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory `CacheStore` with per-entry TTLs
///
/// Distinct instances naturally give distinct key namespaces. The lock is
/// never held across an await point.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn insert(&self, key: &str, value: Value, ttl: Duration) {
        let mut entries = self.entries.write().unwrap();
        // Writes also sweep out whatever has lapsed, keeping the map from
        // accumulating dead entries between reads.
        entries.retain(|_, entry| !entry.is_expired());
        entries.insert(key.to_string(), Entry::new(value, ttl));
    }

    fn read<T>(&self, key: &str, f: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return f(&entry.value),
                Some(_) => {}
                None => return None,
            }
        }
        // Entry lapsed: evict it under the write lock.
        let mut entries = self.entries.write().unwrap();
        if entries.get(key).is_some_and(Entry::is_expired) {
            entries.remove(key);
        }
        None
    }

    /// Number of live entries (test helper)
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap();
        entries.values().filter(|entry| !entry.is_expired()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.insert(key, Value::Text(value.to_string()), ttl);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.read(key, |value| match value {
            Value::Text(text) => Some(text.clone()),
            Value::Hash(_) => None,
        }))
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.read(key, |_| Some(())).is_some())
    }

    async fn set_hash(
        &self,
        key: &str,
        fields: &HashMap<String, String>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.insert(key, Value::Hash(fields.clone()), ttl);
        Ok(())
    }

    async fn get_hash(&self, key: &str) -> Result<Option<HashMap<String, String>>, CacheError> {
        Ok(self.read(key, |value| match value {
            Value::Hash(fields) => Some(fields.clone()),
            Value::Text(_) => None,
        }))
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.entries.write().unwrap().clear();
        Ok(())
    }
}
