//! Integration tests for the wired-up token service factory

use std::time::Duration as StdDuration;

use gj_core::services::token::{RejectionReason, TokenServiceConfig, ValidationOutcome};
use gj_infra::build_token_service;
use gj_infra::config::CacheConfig;

fn short_lived_config() -> TokenServiceConfig {
    TokenServiceConfig {
        secret: "factory-test-secret".to_string(),
        issuer: "factory-tests".to_string(),
        token_ttl_seconds: 1,
        grace_window_seconds: 1,
        sweep_interval_seconds: 1,
    }
}

#[tokio::test]
async fn built_service_issues_and_validates() {
    let service = build_token_service(
        TokenServiceConfig {
            secret: "factory-test-secret".to_string(),
            issuer: "factory-tests".to_string(),
            ..TokenServiceConfig::default()
        },
        &CacheConfig::default(),
    )
    .await;

    let token = service.issue("42").await.unwrap();
    assert_eq!(
        service.validate(&token).await.unwrap(),
        ValidationOutcome::Accepted {
            subject: "42".to_string()
        }
    );
}

#[tokio::test]
async fn built_service_reclaims_stale_records_without_traffic() {
    let service = build_token_service(short_lived_config(), &CacheConfig::default()).await;

    let token = service.issue("42").await.unwrap();

    // Let the token expire, then open a grace record with one expired use.
    tokio::time::sleep(StdDuration::from_millis(2200)).await;
    assert!(matches!(
        service.validate(&token).await.unwrap(),
        ValidationOutcome::RenewalOffered { .. }
    ));
    assert_eq!(service.grace_registry().pending_count().await, 1);

    // No further presentations of the original: the background reclamation
    // started by the factory must remove the record and revoke the token
    // on its own.
    tokio::time::sleep(StdDuration::from_millis(2500)).await;

    assert_eq!(service.grace_registry().pending_count().await, 0);
    assert!(service.is_revoked(&token).await);
    assert_eq!(
        service.validate(&token).await.unwrap(),
        ValidationOutcome::Rejected(RejectionReason::Revoked)
    );
}
