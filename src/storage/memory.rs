//! In-memory observation store
//!
//! Keeps everything in process memory. Used by embedders that only need the
//! live tracker state, and by tests that want to inspect what was written.

use super::ObservationStore;
use crate::monitor::HealthObservation;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Consolidated store state - single lock
#[derive(Debug, Default)]
struct MemoryStoreData {
    observations: Vec<HealthObservation>,
    last_checked: HashMap<String, DateTime<Utc>>,
}

/// Observation store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryObservationStore {
    data: RwLock<MemoryStoreData>,
}

impl MemoryObservationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded observations in insertion order
    pub async fn observations(&self) -> Vec<HealthObservation> {
        self.data.read().await.observations.clone()
    }

    /// Recorded observations for one provider
    pub async fn observations_for(&self, provider_id: &str) -> Vec<HealthObservation> {
        self.data
            .read()
            .await
            .observations
            .iter()
            .filter(|o| o.provider_id == provider_id)
            .cloned()
            .collect()
    }

    /// Number of recorded observations
    pub async fn observation_count(&self) -> usize {
        self.data.read().await.observations.len()
    }

    /// Last-checked stamp for one provider
    pub async fn last_checked(&self, provider_id: &str) -> Option<DateTime<Utc>> {
        self.data.read().await.last_checked.get(provider_id).copied()
    }
}

#[async_trait]
impl ObservationStore for MemoryObservationStore {
    async fn record_observation(&self, observation: &HealthObservation) -> Result<()> {
        let mut data = self.data.write().await;
        data.observations.push(observation.clone());
        Ok(())
    }

    async fn update_last_checked(
        &self,
        provider_id: &str,
        checked_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut data = self.data.write().await;
        data.last_checked.insert(provider_id.to_string(), checked_at);
        Ok(())
    }
}
