//! Health change event publishing
//!
//! Turns confirmed state transitions into events on the bus. Delivery is
//! best effort: a failed publish is logged and dropped, never retried
//! inline, and never affects the monitoring cycle that produced it.

use super::types::HealthObservation;
use crate::events::{HealthEventBus, ProviderHealthChanged};
use std::sync::Arc;
use tracing::{info, warn};

/// Publishes confirmed health transitions to the event bus
#[derive(Clone)]
pub struct HealthEventPublisher {
    bus: Arc<dyn HealthEventBus>,
}

impl HealthEventPublisher {
    /// Create a publisher over the given bus
    pub fn new(bus: Arc<dyn HealthEventBus>) -> Self {
        Self { bus }
    }

    /// Publish one confirmed transition, swallowing delivery failures
    pub async fn publish_change(&self, observation: &HealthObservation) {
        let event = ProviderHealthChanged::from_observation(observation);
        info!(
            "Provider {} health changed: {} (correlation {})",
            event.provider_id, event.status, event.correlation_id
        );

        if let Err(e) = self.bus.publish(&event).await {
            warn!(
                "Failed to publish health change for provider {}: {}",
                observation.provider_id, e
            );
        }
    }
}
