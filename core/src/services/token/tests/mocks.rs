//! Mock cache store for token service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::CacheError;
use crate::repositories::CacheStore;

enum MockValue {
    Text(String),
    Hash(HashMap<String, String>),
}

struct MockEntry {
    value: MockValue,
    expires_at: DateTime<Utc>,
}

impl MockEntry {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// In-memory `CacheStore` honoring TTLs, with switchable failure injection
pub struct MockCacheStore {
    entries: Mutex<HashMap<String, MockEntry>>,
    failing: AtomicBool,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent operation fail with a backend error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn check_failing(&self) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CacheError::backend("injected failure"))
        } else {
            Ok(())
        }
    }

    fn expires_at(ttl: Duration) -> DateTime<Utc> {
        Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero())
    }
}

#[async_trait]
impl CacheStore for MockCacheStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.check_failing()?;
        self.entries.lock().unwrap().insert(
            key.to_string(),
            MockEntry {
                value: MockValue::Text(value.to_string()),
                expires_at: Self::expires_at(ttl),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_failing()?;
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).and_then(|entry| match &entry.value {
            MockValue::Text(value) if !entry.is_expired() => Some(value.clone()),
            _ => None,
        }))
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.check_failing()?;
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).is_some_and(|entry| !entry.is_expired()))
    }

    async fn set_hash(
        &self,
        key: &str,
        fields: &HashMap<String, String>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.check_failing()?;
        self.entries.lock().unwrap().insert(
            key.to_string(),
            MockEntry {
                value: MockValue::Hash(fields.clone()),
                expires_at: Self::expires_at(ttl),
            },
        );
        Ok(())
    }

    async fn get_hash(&self, key: &str) -> Result<Option<HashMap<String, String>>, CacheError> {
        self.check_failing()?;
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).and_then(|entry| match &entry.value {
            MockValue::Hash(fields) if !entry.is_expired() => Some(fields.clone()),
            _ => None,
        }))
    }

    async fn close(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
