//! Health check cycle orchestration
//!
//! One cycle fetches the provider inventory, filters it down to providers
//! that are enabled and explicitly monitored, probes them all concurrently,
//! then persists each observation, feeds the dampening tracker, and
//! publishes any confirmed transitions.

use super::history::HealthHistoryTracker;
use super::probe::{HealthProbe, ProbeExecutor};
use super::publisher::HealthEventPublisher;
use crate::config::MonitorConfig;
use crate::events::HealthEventBus;
use crate::registry::{ProviderRegistry, RegisteredProvider};
use crate::storage::ObservationStore;
use crate::utils::error::Result;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, warn};

/// Counters describing one completed health check cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSummary {
    /// Providers whose observations were processed
    pub providers_checked: usize,
    /// Confirmed state transitions handed to the publisher
    pub confirmed_changes: usize,
    /// True when the cycle was cut short by shutdown
    pub cancelled: bool,
}

/// Runs health check cycles over the registered providers
pub struct ProbeOrchestrator {
    registry: Arc<dyn ProviderRegistry>,
    executor: ProbeExecutor,
    store: Arc<dyn ObservationStore>,
    tracker: Arc<HealthHistoryTracker>,
    publisher: HealthEventPublisher,
    default_timeout: Duration,
}

impl ProbeOrchestrator {
    /// Create an orchestrator from its collaborators
    pub fn new(
        registry: Arc<dyn ProviderRegistry>,
        probe: Arc<dyn HealthProbe>,
        store: Arc<dyn ObservationStore>,
        bus: Arc<dyn HealthEventBus>,
        tracker: Arc<HealthHistoryTracker>,
        config: &MonitorConfig,
    ) -> Self {
        Self {
            registry,
            executor: ProbeExecutor::new(probe),
            store,
            tracker,
            publisher: HealthEventPublisher::new(bus),
            default_timeout: config.timeout(),
        }
    }

    /// Run one health check cycle.
    ///
    /// Registry failures propagate as cycle errors. Everything downstream
    /// of the registry is isolated per provider: a failed probe becomes an
    /// offline observation, and storage or publish failures are logged
    /// without affecting the other providers in the batch.
    pub async fn run_cycle(&self, shutdown: watch::Receiver<bool>) -> Result<CycleSummary> {
        let providers = self.registry.list_providers().await?;
        let monitoring = self.registry.monitoring_configs().await?;

        let targets: Vec<(RegisteredProvider, Duration)> = providers
            .into_iter()
            .filter(|provider| provider.enabled)
            .filter_map(|provider| match monitoring.get(&provider.id) {
                Some(policy) if policy.monitoring_enabled => {
                    let timeout = policy.timeout_or(self.default_timeout);
                    Some((provider, timeout))
                }
                // No policy row means not monitored
                _ => None,
            })
            .collect();

        if targets.is_empty() {
            debug!("No providers enabled for health monitoring, skipping cycle");
            return Ok(CycleSummary::default());
        }

        debug!("Probing {} providers", targets.len());

        // One task per provider; the batch size is the provider count, so
        // no concurrency cap is applied
        let mut handles = Vec::with_capacity(targets.len());
        for (provider, timeout) in targets {
            let executor = self.executor.clone();
            handles.push(tokio::spawn(async move {
                executor.execute(&provider, timeout).await
            }));
        }

        let in_flight = handles.len();
        let mut shutdown = shutdown;
        let joined = tokio::select! {
            joined = join_all(handles) => joined,
            _ = shutdown.changed() => {
                // Detached probes run to completion on the runtime; their
                // results are discarded
                warn!(
                    "Health check cycle cancelled with {} probes in flight, discarding results",
                    in_flight
                );
                return Ok(CycleSummary {
                    cancelled: true,
                    ..Default::default()
                });
            }
        };

        let mut summary = CycleSummary::default();
        for join_result in joined {
            let observation = match join_result {
                Ok(observation) => observation,
                Err(e) => {
                    error!("Health probe task failed: {}", e);
                    continue;
                }
            };

            // Persist before evaluating; a failed write never blocks
            // dampening or publication
            if let Err(e) = self.store.record_observation(&observation).await {
                warn!(
                    "Failed to persist observation for provider {}: {}",
                    observation.provider_id, e
                );
            }
            if let Err(e) = self
                .store
                .update_last_checked(&observation.provider_id, observation.observed_at)
                .await
            {
                warn!(
                    "Failed to stamp last check for provider {}: {}",
                    observation.provider_id, e
                );
            }

            let confirmed = self.tracker.record(
                &observation.provider_id,
                observation.status,
                observation.response_time_ms,
            );
            if confirmed {
                self.publisher.publish_change(&observation).await;
                summary.confirmed_changes += 1;
            }
            summary.providers_checked += 1;
        }

        Ok(summary)
    }
}
