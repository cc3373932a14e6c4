//! Periodic sweep of stale grace-period records
//!
//! The per-record one-shot timers bound cleanup latency for a single
//! record, but a lost task would leave its record behind; the periodic
//! sweep is the backstop that guarantees eventual consistency of the
//! registry even without further traffic.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::grace::GraceRegistry;

/// Configuration for the grace-period sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// How often to run the sweep, in seconds; zero or negative disables
    /// the sweep entirely
    pub interval_seconds: i64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
        }
    }
}

impl SweeperConfig {
    /// Whether the periodic sweep is enabled
    pub fn is_enabled(&self) -> bool {
        self.interval_seconds > 0
    }
}

/// Service that periodically reclaims stale grace-period records
pub struct GraceSweeper {
    registry: Arc<GraceRegistry>,
    config: SweeperConfig,
}

impl GraceSweeper {
    pub fn new(registry: Arc<GraceRegistry>, config: SweeperConfig) -> Self {
        Self { registry, config }
    }

    /// Runs a single sweep cycle
    ///
    /// Every record whose stored absolute deadline has passed is removed
    /// and its original token revoked. Failed revocations keep their record
    /// for the next cycle.
    pub async fn run_sweep(&self) -> SweepReport {
        let (reclaimed, failed) = self.registry.sweep().await;
        let pending = self.registry.pending_count().await;

        if reclaimed > 0 || failed > 0 {
            info!(reclaimed, failed, pending, "Grace period sweep completed");
        } else {
            debug!(pending, "Grace period sweep found nothing to reclaim");
        }

        SweepReport {
            reclaimed,
            failed,
            pending,
        }
    }

    /// Starts the sweeper as a background task
    ///
    /// Spawns a tokio task that sweeps at the configured interval. Does
    /// nothing when the sweep is disabled.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.is_enabled() {
            warn!("Grace period sweep is disabled; relying on one-shot reclamation only");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds as u64);

        tokio::spawn(async move {
            info!(
                "Grace period sweeper started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so a sweep only
            // runs after a full interval has elapsed.
            interval_timer.tick().await;

            loop {
                interval_timer.tick().await;
                self.run_sweep().await;
            }
        });
    }
}

/// Result of a single sweep cycle
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Records removed and revoked this cycle
    pub reclaimed: usize,
    /// Records whose revocation failed and were kept for retry
    pub failed: usize,
    /// Records still pending after the sweep
    pub pending: usize,
}
