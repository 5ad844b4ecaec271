//! Health event bus
//!
//! Outbound side of the monitor: confirmed health transitions leave the
//! process through the `HealthEventBus` seam. The wire schema is the
//! camelCase JSON consumers of the gateway's webhook feed already expect.

pub mod webhook;

pub use webhook::WebhookEventBus;

use crate::monitor::HealthObservation;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Event emitted when a provider's published health state changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealthChanged {
    /// Provider identifier
    pub provider_id: String,
    /// Provider type tag
    pub provider_type: String,
    /// Whether the new state is healthy
    pub is_healthy: bool,
    /// Human-readable status, e.g. "online: healthy"
    pub status: String,
    /// Observation details (responseTimeMs, errorCategory, timestamp)
    pub health_data: serde_json::Value,
    /// Fresh correlation id for tracing the event downstream
    pub correlation_id: String,
}

impl ProviderHealthChanged {
    /// Build the event for a confirmed transition
    pub fn from_observation(observation: &HealthObservation) -> Self {
        let health_data = serde_json::json!({
            "responseTimeMs": observation.response_time_ms,
            "errorCategory": observation.error_category.map(|c| c.as_str()),
            "timestamp": observation.observed_at,
        });

        Self {
            provider_id: observation.provider_id.clone(),
            provider_type: observation.provider_type.clone(),
            is_healthy: observation.is_healthy(),
            status: format!("{}: {}", observation.status, observation.status_message()),
            health_data,
            correlation_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Transport for health change events
#[async_trait]
pub trait HealthEventBus: Send + Sync {
    /// Deliver one event
    async fn publish(&self, event: &ProviderHealthChanged) -> Result<()>;
}

/// Bus that drops every event
///
/// Used when no downstream consumer is wired up, so the monitor can run
/// with publishing effectively disabled.
#[derive(Debug, Default)]
pub struct NullEventBus;

impl NullEventBus {
    /// Create a null bus
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HealthEventBus for NullEventBus {
    async fn publish(&self, event: &ProviderHealthChanged) -> Result<()> {
        debug!(
            "Dropping health event for provider {} (no event bus configured)",
            event.provider_id
        );
        Ok(())
    }
}
