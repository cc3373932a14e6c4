//! Unit tests for the grace period sweeper

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;

use super::mocks::MockCacheStore;
use crate::repositories::CacheStore;
use crate::services::token::{
    ClaimsCodec, GraceRegistry, GraceSweeper, RevocationStore, SweepReport, SweeperConfig,
};

fn setup(window: Duration) -> (Arc<GraceRegistry>, Arc<ClaimsCodec>, Arc<MockCacheStore>) {
    let codec = Arc::new(ClaimsCodec::new(b"test-secret", "grace-jwt-test"));
    let store = Arc::new(MockCacheStore::new());
    let revocations = Arc::new(RevocationStore::new(store.clone() as Arc<dyn CacheStore>));
    let registry = Arc::new(GraceRegistry::new(
        Arc::clone(&codec),
        revocations,
        window,
        Duration::seconds(60),
    ));
    (registry, codec, store)
}

async fn open_record(registry: &Arc<GraceRegistry>, codec: &ClaimsCodec, subject: &str) -> String {
    let (token, _) = codec.issue(subject, Duration::seconds(-1)).unwrap();
    let claims = codec.verify_ignoring_expiry(&token).unwrap();
    registry.handle_expired_use(&token, &claims).await.unwrap();
    token
}

#[test]
fn test_non_positive_interval_disables_the_sweep() {
    assert!(!SweeperConfig { interval_seconds: 0 }.is_enabled());
    assert!(!SweeperConfig {
        interval_seconds: -10
    }
    .is_enabled());
    assert!(SweeperConfig { interval_seconds: 1 }.is_enabled());
}

#[tokio::test]
async fn test_run_sweep_reclaims_stale_records_only() {
    let (registry, codec, store) = setup(Duration::milliseconds(50));
    let first = open_record(&registry, &codec, "1").await;
    let second = open_record(&registry, &codec, "2").await;

    tokio::time::sleep(StdDuration::from_millis(120)).await;

    let sweeper = GraceSweeper::new(Arc::clone(&registry), SweeperConfig::default());
    let report = sweeper.run_sweep().await;
    assert_eq!(
        report,
        SweepReport {
            reclaimed: 2,
            failed: 0,
            pending: 0,
        }
    );

    assert!(store.exists(&first).await.unwrap());
    assert!(store.exists(&second).await.unwrap());

    // A second sweep has nothing left to do.
    assert_eq!(sweeper.run_sweep().await.reclaimed, 0);
}

#[tokio::test]
async fn test_run_sweep_leaves_records_within_their_window() {
    let (registry, codec, _store) = setup(Duration::seconds(30));
    let token = open_record(&registry, &codec, "1").await;

    let sweeper = GraceSweeper::new(Arc::clone(&registry), SweeperConfig::default());
    let report = sweeper.run_sweep().await;

    assert_eq!(report.reclaimed, 0);
    assert_eq!(report.pending, 1);
    assert!(registry.is_pending(&token).await);
}

#[tokio::test]
async fn test_disabled_sweeper_does_not_spawn() {
    let (registry, _codec, _store) = setup(Duration::seconds(30));
    let sweeper = Arc::new(GraceSweeper::new(
        registry,
        SweeperConfig {
            interval_seconds: 0,
        },
    ));
    // Returns immediately without spawning a task.
    sweeper.start_background_task();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_background_task_eventually_reclaims() {
    let (registry, codec, store) = setup(Duration::milliseconds(50));
    let sweeper = Arc::new(GraceSweeper::new(
        Arc::clone(&registry),
        SweeperConfig {
            interval_seconds: 1,
        },
    ));
    sweeper.start_background_task();

    let token = open_record(&registry, &codec, "1").await;
    tokio::time::sleep(StdDuration::from_millis(2500)).await;

    assert!(!registry.is_pending(&token).await);
    assert!(store.exists(&token).await.unwrap());
}
