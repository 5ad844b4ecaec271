//! Append-only JSONL observation store
//!
//! Writes each observation as one JSON line to a local file. This is the
//! sink the standalone daemon uses; the file can be tailed or bulk-loaded
//! elsewhere without any coordination with the monitor.

use super::ObservationStore;
use crate::monitor::HealthObservation;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Observation store backed by an append-only JSONL file
pub struct JsonlObservationStore {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlObservationStore {
    /// Open the file for appending, creating it if missing
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        debug!("Recording health observations to {:?}", path);
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ObservationStore for JsonlObservationStore {
    async fn record_observation(&self, observation: &HealthObservation) -> Result<()> {
        let mut line = serde_json::to_string(observation)?;
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }

    /// The stamp is implicit here: every appended row carries its own
    /// observed-at timestamp, so the provider's last-checked time is the
    /// timestamp of its newest row. No separate write is made.
    async fn update_last_checked(
        &self,
        provider_id: &str,
        checked_at: DateTime<Utc>,
    ) -> Result<()> {
        debug!(
            "Provider {} last checked at {} (implicit in appended rows)",
            provider_id, checked_at
        );
        Ok(())
    }
}
