//! Periodic health check scheduling
//!
//! Owns the timer loop that drives the orchestrator. The loop waits a short
//! startup delay, runs one cycle immediately, then repeats at the
//! configured period until the shutdown signal flips. A failed cycle is
//! logged and the loop keeps going; nothing short of shutdown stops it.

use super::orchestrator::ProbeOrchestrator;
use crate::config::MonitorConfig;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Drives health check cycles on a fixed period
pub struct HealthCheckScheduler {
    orchestrator: Arc<ProbeOrchestrator>,
    config: MonitorConfig,
}

impl HealthCheckScheduler {
    /// Create a scheduler over the orchestrator
    pub fn new(orchestrator: Arc<ProbeOrchestrator>, config: MonitorConfig) -> Self {
        Self {
            orchestrator,
            config,
        }
    }

    /// Run the scheduling loop until shutdown.
    ///
    /// Returns immediately when monitoring is disabled. The shutdown
    /// receiver is observed between cycles and during the startup delay;
    /// dropping the sender counts as shutdown.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if !self.config.enabled {
            info!("Health monitoring disabled, scheduler not starting");
            return;
        }

        let startup_delay = self.config.startup_delay();
        let period = self.config.interval();
        info!(
            "Health check scheduler starting: {}s period after {}s startup delay",
            period.as_secs(),
            startup_delay.as_secs()
        );

        tokio::select! {
            _ = tokio::time::sleep(startup_delay) => {}
            _ = shutdown.changed() => {
                info!("Health check scheduler stopped during startup delay");
                return;
            }
        }

        let mut interval = tokio::time::interval(period);
        loop {
            let cycle_signal = shutdown.clone();
            tokio::select! {
                _ = interval.tick() => {
                    match self.orchestrator.run_cycle(cycle_signal).await {
                        Ok(summary) if summary.cancelled => {
                            info!("Health check scheduler stopping, cycle was cancelled");
                            break;
                        }
                        Ok(summary) => {
                            debug!(
                                "Health check cycle completed: {} providers checked, {} state changes",
                                summary.providers_checked, summary.confirmed_changes
                            );
                        }
                        Err(e) => {
                            // Next tick gets a fresh attempt
                            error!("Health check cycle failed: {}", e);
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("Health check scheduler received shutdown signal");
                    break;
                }
            }
        }
    }

    /// Spawn the scheduling loop onto the runtime
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
