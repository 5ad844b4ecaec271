//! Observation persistence
//!
//! Write-only sink for health observations. The monitor records what it saw
//! and moves on; reading the data back for statistics belongs to whoever
//! owns the sink.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlObservationStore;
pub use memory::MemoryObservationStore;

use crate::monitor::HealthObservation;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Write-only persistence for probe observations
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Append one observation
    async fn record_observation(&self, observation: &HealthObservation) -> Result<()>;

    /// Stamp the provider's last-checked time
    async fn update_last_checked(
        &self,
        provider_id: &str,
        checked_at: DateTime<Utc>,
    ) -> Result<()>;
}
