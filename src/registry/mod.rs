//! Provider registry interface
//!
//! The monitor consumes providers through a read-only registry seam. Hosts
//! back it with whatever owns their provider inventory; the crate ships a
//! static implementation for the standalone daemon and for tests.

use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A provider as surfaced by the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredProvider {
    /// Provider identifier, unique within the registry
    pub id: String,
    /// Provider type tag (e.g. "openai", "anthropic")
    pub provider_type: String,
    /// Whether the provider is enabled at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Endpoint the reachability probe targets
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Credential passed to the probe as a bearer token
    #[serde(default)]
    pub api_key: Option<String>,
}

impl RegisteredProvider {
    /// Create an enabled provider row
    pub fn new(id: impl Into<String>, provider_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider_type: provider_type.into(),
            enabled: true,
            endpoint: None,
            api_key: None,
        }
    }

    /// Set the probe endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the probe credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Per-provider monitoring policy
///
/// A provider with no policy row is not monitored: absence of an explicit
/// decision means excluded, never included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMonitoringConfig {
    /// Whether health checks run for this provider
    #[serde(default)]
    pub monitoring_enabled: bool,
    /// Desired check interval in minutes (informational; the scheduler
    /// currently runs one global period)
    #[serde(default = "default_check_interval_minutes")]
    pub check_interval_minutes: u64,
    /// Probe timeout override in seconds, None falls back to the global
    /// default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl ProviderMonitoringConfig {
    /// Policy with monitoring switched on and default timings
    pub fn enabled() -> Self {
        Self {
            monitoring_enabled: true,
            ..Default::default()
        }
    }

    /// Effective probe timeout given the global fallback
    pub fn timeout_or(&self, fallback: Duration) -> Duration {
        self.timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(fallback)
    }
}

impl Default for ProviderMonitoringConfig {
    fn default() -> Self {
        Self {
            monitoring_enabled: false,
            check_interval_minutes: default_check_interval_minutes(),
            timeout_seconds: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_check_interval_minutes() -> u64 {
    1
}

/// Read-only access to the provider inventory
#[async_trait]
pub trait ProviderRegistry: Send + Sync {
    /// Current list of registered providers
    async fn list_providers(&self) -> Result<Vec<RegisteredProvider>>;

    /// Monitoring policies keyed by provider id
    async fn monitoring_configs(&self) -> Result<HashMap<String, ProviderMonitoringConfig>>;
}

/// Fixed in-memory registry for the daemon and for tests
pub struct StaticProviderRegistry {
    providers: Vec<RegisteredProvider>,
    monitoring: HashMap<String, ProviderMonitoringConfig>,
}

impl StaticProviderRegistry {
    /// Create a registry over a fixed provider set
    pub fn new(
        providers: Vec<RegisteredProvider>,
        monitoring: HashMap<String, ProviderMonitoringConfig>,
    ) -> Self {
        Self {
            providers,
            monitoring,
        }
    }

    /// Registry where every listed provider is monitored with defaults
    pub fn monitoring_all(providers: Vec<RegisteredProvider>) -> Self {
        let monitoring = providers
            .iter()
            .map(|p| (p.id.clone(), ProviderMonitoringConfig::enabled()))
            .collect();
        Self {
            providers,
            monitoring,
        }
    }
}

#[async_trait]
impl ProviderRegistry for StaticProviderRegistry {
    async fn list_providers(&self) -> Result<Vec<RegisteredProvider>> {
        Ok(self.providers.clone())
    }

    async fn monitoring_configs(&self) -> Result<HashMap<String, ProviderMonitoringConfig>> {
        Ok(self.monitoring.clone())
    }
}
