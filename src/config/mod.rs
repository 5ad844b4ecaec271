//! Configuration for the health monitor
//!
//! This module handles loading and validation of monitor configuration,
//! the daemon's provider inventory, and its event/persistence wiring.

use crate::monitor::history::{DEFAULT_CONFIRMATION_STREAK, DEFAULT_WINDOW_SIZE};
use crate::registry::{ProviderMonitoringConfig, RegisteredProvider, StaticProviderRegistry};
use crate::utils::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Main configuration for the watcher daemon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Monitoring engine settings
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Provider inventory with per-provider monitoring policies
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
    /// Webhook URL health events are POSTed to, events are dropped if unset
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// JSONL file observations are appended to, kept in memory if unset
    #[serde(default)]
    pub observations_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MonitorError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.monitor.validate()?;

        let mut seen = HashSet::new();
        for entry in &self.providers {
            if !seen.insert(entry.provider.id.as_str()) {
                return Err(MonitorError::Config(format!(
                    "Duplicate provider id: {}",
                    entry.provider.id
                )));
            }
        }

        Ok(())
    }

    /// Build the static registry described by the provider entries.
    ///
    /// Entries without a monitoring policy get no policy row, which leaves
    /// them unmonitored.
    pub fn registry(&self) -> StaticProviderRegistry {
        let providers = self
            .providers
            .iter()
            .map(|entry| entry.provider.clone())
            .collect();
        let monitoring = self
            .providers
            .iter()
            .filter_map(|entry| {
                entry
                    .monitoring
                    .clone()
                    .map(|policy| (entry.provider.id.clone(), policy))
            })
            .collect();
        StaticProviderRegistry::new(providers, monitoring)
    }
}

/// One provider row in the daemon's config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Provider identity and probe target
    #[serde(flatten)]
    pub provider: RegisteredProvider,
    /// Monitoring policy, absent means not monitored
    #[serde(default)]
    pub monitoring: Option<ProviderMonitoringConfig>,
}

/// Monitoring engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Master switch for the scheduler
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minutes between health check cycles
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    /// Seconds to wait before the first cycle
    #[serde(default = "default_startup_delay_seconds")]
    pub startup_delay_seconds: u64,
    /// Default probe timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Flap dampening settings
    #[serde(default)]
    pub hysteresis: HysteresisConfig,
}

impl MonitorConfig {
    /// Period between cycles
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }

    /// Delay before the first cycle
    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_seconds)
    }

    /// Default probe timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Load settings from PROVIDERWATCH_* environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Overlay PROVIDERWATCH_* environment variables onto these settings.
    ///
    /// Unset variables leave the current values in place, so this layers
    /// cleanly on top of a file-loaded configuration.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(enabled) = env_parse::<bool>("PROVIDERWATCH_ENABLED")? {
            self.enabled = enabled;
        }
        if let Some(minutes) = env_parse::<u64>("PROVIDERWATCH_INTERVAL_MINUTES")? {
            self.interval_minutes = minutes;
        }
        if let Some(seconds) = env_parse::<u64>("PROVIDERWATCH_STARTUP_DELAY_SECONDS")? {
            self.startup_delay_seconds = seconds;
        }
        if let Some(seconds) = env_parse::<u64>("PROVIDERWATCH_TIMEOUT_SECONDS")? {
            self.timeout_seconds = seconds;
        }
        self.validate()
    }

    /// Validate the monitor settings
    pub fn validate(&self) -> Result<()> {
        if self.interval_minutes == 0 {
            return Err(MonitorError::Config(
                "interval_minutes must be at least 1".to_string(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(MonitorError::Config(
                "timeout_seconds must be at least 1".to_string(),
            ));
        }
        self.hysteresis.validate()
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: default_interval_minutes(),
            startup_delay_seconds: default_startup_delay_seconds(),
            timeout_seconds: default_timeout_seconds(),
            hysteresis: HysteresisConfig::default(),
        }
    }
}

/// Flap dampening settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HysteresisConfig {
    /// Observations retained per provider
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Consecutive identical observations required to confirm a change
    #[serde(default = "default_confirmation_streak")]
    pub confirmation_streak: usize,
}

impl HysteresisConfig {
    /// Validate the dampening settings
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(MonitorError::Config(
                "hysteresis window_size must be at least 1".to_string(),
            ));
        }
        if self.confirmation_streak == 0 {
            return Err(MonitorError::Config(
                "hysteresis confirmation_streak must be at least 1".to_string(),
            ));
        }
        if self.confirmation_streak > self.window_size {
            return Err(MonitorError::Config(format!(
                "hysteresis confirmation_streak ({}) cannot exceed window_size ({})",
                self.confirmation_streak, self.window_size
            )));
        }
        Ok(())
    }
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            confirmation_streak: default_confirmation_streak(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_minutes() -> u64 {
    1
}

fn default_startup_delay_seconds() -> u64 {
    10
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_confirmation_streak() -> usize {
    DEFAULT_CONFIRMATION_STREAK
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e| MonitorError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert!(config.enabled);
        assert_eq!(config.interval_minutes, 1);
        assert_eq!(config.startup_delay_seconds, 10);
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.hysteresis.window_size, 5);
        assert_eq!(config.hysteresis.confirmation_streak, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = MonitorConfig {
            interval_minutes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_streak_longer_than_window() {
        let hysteresis = HysteresisConfig {
            window_size: 3,
            confirmation_streak: 4,
        };
        assert!(hysteresis.validate().is_err());
    }

    #[test]
    fn test_parses_yaml_with_defaults() {
        let yaml = r#"
monitor:
  interval_minutes: 5
providers:
  - id: openai-main
    provider_type: openai
    endpoint: https://api.openai.com/v1/models
    monitoring:
      monitoring_enabled: true
      timeout_seconds: 5
  - id: unmonitored
    provider_type: anthropic
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.monitor.interval_minutes, 5);
        assert_eq!(config.monitor.timeout_seconds, 10);
        assert_eq!(config.providers.len(), 2);
        assert!(config.providers[0].provider.enabled);
        assert_eq!(
            config.providers[0].monitoring.as_ref().unwrap().timeout_seconds,
            Some(5)
        );
        assert!(config.providers[1].monitoring.is_none());
        assert!(config.validate().is_ok());
    }

    // One test owns every PROVIDERWATCH_* variable; splitting these up
    // would race under the parallel test runner
    #[test]
    fn test_env_overrides() {
        // SAFETY: no other test reads or writes these variables
        unsafe {
            std::env::set_var("PROVIDERWATCH_ENABLED", "false");
            std::env::set_var("PROVIDERWATCH_INTERVAL_MINUTES", "7");
            std::env::set_var("PROVIDERWATCH_TIMEOUT_SECONDS", "3");
        }
        let config = MonitorConfig::from_env().unwrap();
        assert!(!config.enabled);
        assert_eq!(config.interval_minutes, 7);
        assert_eq!(config.timeout_seconds, 3);
        // Unset variables keep their defaults
        assert_eq!(config.startup_delay_seconds, 10);

        // Overlaying onto a file-loaded config replaces only the set keys
        let mut layered = MonitorConfig {
            interval_minutes: 30,
            startup_delay_seconds: 1,
            ..Default::default()
        };
        layered.apply_env_overrides().unwrap();
        assert_eq!(layered.interval_minutes, 7);
        assert_eq!(layered.startup_delay_seconds, 1);

        // Unparseable and out-of-range values are configuration errors
        unsafe { std::env::set_var("PROVIDERWATCH_INTERVAL_MINUTES", "soon") };
        let err = MonitorConfig::from_env().unwrap_err();
        assert!(matches!(err, MonitorError::Config(_)));

        unsafe { std::env::set_var("PROVIDERWATCH_INTERVAL_MINUTES", "0") };
        assert!(MonitorConfig::from_env().is_err());

        unsafe {
            std::env::remove_var("PROVIDERWATCH_ENABLED");
            std::env::remove_var("PROVIDERWATCH_INTERVAL_MINUTES");
            std::env::remove_var("PROVIDERWATCH_TIMEOUT_SECONDS");
        }
    }

    #[test]
    fn test_rejects_duplicate_provider_ids() {
        let yaml = r#"
providers:
  - id: dup
    provider_type: openai
  - id: dup
    provider_type: anthropic
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
