//! Webhook event delivery
//!
//! Delivers health change events as JSON POSTs to a configured URL.

use super::{HealthEventBus, ProviderHealthChanged};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DELIVERY_TIMEOUT_SECONDS: u64 = 30;

/// Event bus that POSTs each event to a webhook URL
pub struct WebhookEventBus {
    client: reqwest::Client,
    url: Url,
}

impl WebhookEventBus {
    /// Create a bus for the given webhook URL
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| MonitorError::Config(format!("Invalid webhook URL: {}", e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(MonitorError::Config(format!(
                "Webhook URL must be http or https, got {}",
                url.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DELIVERY_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| MonitorError::Network(e.to_string()))?;

        Ok(Self { client, url })
    }

    /// Webhook URL this bus delivers to
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl HealthEventBus for WebhookEventBus {
    async fn publish(&self, event: &ProviderHealthChanged) -> Result<()> {
        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .header("User-Agent", "providerwatch/0.1")
            .json(event)
            .send()
            .await
            .map_err(|e| MonitorError::Network(e.to_string()))?;

        let status_code = response.status().as_u16();
        if (200..300).contains(&status_code) {
            debug!(
                "Health event for provider {} delivered to {}",
                event.provider_id, self.url
            );
            Ok(())
        } else {
            Err(MonitorError::Publish(format!(
                "Webhook returned status {}",
                status_code
            )))
        }
    }
}
