//! Error types for the health monitor

use crate::monitor::probe::ProbeError;
use thiserror::Error;

/// Result type alias for the health monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for the health monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Probe errors surfaced outside the executor
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Provider registry errors
    #[error("Registry error: {0}")]
    Registry(String),

    /// Observation storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Event publishing errors
    #[error("Publish error: {0}")]
    Publish(String),

    /// Network errors
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
