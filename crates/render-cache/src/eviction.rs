//! Background eviction of expired artifacts
//!
//! One periodic sweep instead of a timer per artifact. An artifact lives at
//! most one sweep interval past the retention window.

use crate::registry::CacheRegistry;
use crate::store::ArtifactStore;
use crate::types::{EvictionConfig, SweepReport};
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// `tokio::time::interval` rejects a zero period.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

pub struct EvictionLoop {
    store: ArtifactStore,
    registry: Arc<CacheRegistry>,
    config: EvictionConfig,
}

impl EvictionLoop {
    pub fn new(store: ArtifactStore, registry: Arc<CacheRegistry>, config: EvictionConfig) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &EvictionConfig {
        &self.config
    }

    fn retention(&self) -> TimeDelta {
        TimeDelta::from_std(self.config.retention).unwrap_or(TimeDelta::MAX)
    }

    /// Run one eviction pass as of `now`.
    ///
    /// Holds the registry's exclusive lock for the whole pass, so puts issued
    /// during a sweep wait and are only considered by the next pass. Every
    /// expired entry is cleared, including when its file could not be removed.
    pub async fn sweep(&self, now: DateTime<Utc>) -> SweepReport {
        let retention = self.retention();
        let mut registry = self.registry.lock().await;

        let mut report = SweepReport {
            scanned: registry.len(),
            ..SweepReport::default()
        };

        for entry in registry.expired(now, retention) {
            match self.store.remove(&entry.path).await {
                Ok(true) => {
                    report.evicted += 1;
                    debug!(path = ?entry.path, "Deleted cached file");
                }
                Ok(false) => {
                    report.already_absent += 1;
                }
                Err(e) => {
                    report.failed += 1;
                    error!(path = ?entry.path, error = %e, "Failed to delete cached file");
                }
            }
            registry.delete(&entry.path);
        }

        report
    }

    /// Spawn the loop on the runtime. It stops once `shutdown` flips to
    /// `true` (or its sender is dropped), never in the middle of a sweep.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let period = self.config.sweep_interval.max(MIN_SWEEP_INTERVAL);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // skip first immediate tick

        info!(
            retention_secs = self.config.retention.as_secs(),
            sweep_interval_secs = period.as_secs(),
            "Cache eviction loop started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.sweep(Utc::now()).await;
                    if report.cleared() > 0 {
                        info!(
                            scanned = report.scanned,
                            evicted = report.evicted,
                            already_absent = report.already_absent,
                            failed = report.failed,
                            "Cache sweep complete"
                        );
                    } else {
                        debug!(scanned = report.scanned, "Cache sweep found nothing to evict");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Cache eviction loop stopped");
    }
}
