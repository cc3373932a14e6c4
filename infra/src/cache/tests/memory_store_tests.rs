//! Behavior tests for the embedded memory store

use std::collections::HashMap;
use std::time::Duration;

use gj_core::repositories::CacheStore;

use crate::cache::MemoryStore;

const TTL: Duration = Duration::from_secs(60);

#[tokio::test]
async fn test_set_get_round_trip() {
    let store = MemoryStore::new();

    store.set("a", "1", TTL).await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
    assert_eq!(store.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_exists_reflects_live_entries() {
    let store = MemoryStore::new();

    assert!(!store.exists("a").await.unwrap());
    store.set("a", "1", TTL).await.unwrap();
    assert!(store.exists("a").await.unwrap());
}

#[tokio::test]
async fn test_expired_entries_behave_as_missing() {
    let store = MemoryStore::new();

    store.set("a", "1", Duration::from_millis(30)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(store.get("a").await.unwrap(), None);
    assert!(!store.exists("a").await.unwrap());
    // Lazy eviction removed the entry entirely.
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_set_overwrites_and_refreshes_ttl() {
    let store = MemoryStore::new();

    store.set("a", "1", Duration::from_millis(30)).await.unwrap();
    store.set("a", "2", TTL).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(store.get("a").await.unwrap(), Some("2".to_string()));
}

#[tokio::test]
async fn test_hash_round_trip() {
    let store = MemoryStore::new();
    let fields = HashMap::from([
        ("subject".to_string(), "42".to_string()),
        ("expires_at".to_string(), "123456".to_string()),
    ]);

    store.set_hash("token", &fields, TTL).await.unwrap();
    assert_eq!(store.get_hash("token").await.unwrap(), Some(fields));
    assert_eq!(store.get_hash("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_value_kinds_do_not_cross_over() {
    let store = MemoryStore::new();

    store.set("text", "1", TTL).await.unwrap();
    store
        .set_hash("hash", &HashMap::from([("f".to_string(), "v".to_string())]), TTL)
        .await
        .unwrap();

    assert_eq!(store.get_hash("text").await.unwrap(), None);
    assert_eq!(store.get("hash").await.unwrap(), None);
}

#[tokio::test]
async fn test_writes_purge_lapsed_entries() {
    let store = MemoryStore::new();

    store.set("a", "1", Duration::from_millis(30)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;
    store.set("b", "2", TTL).await.unwrap();

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_close_clears_the_store() {
    let store = MemoryStore::new();

    store.set("a", "1", TTL).await.unwrap();
    store.close().await.unwrap();

    assert!(store.is_empty());
}
