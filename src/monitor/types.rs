//! Health status types and probe observations
//!
//! This module defines the core types for provider health monitoring
//! including health states, failure categories, and probe observations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider health states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    /// Provider responded successfully
    Online,
    /// Provider failed to respond or responded with an error
    Offline,
    /// Provider has not been observed yet
    Unknown,
}

impl ProviderStatus {
    /// Check if the status counts as healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProviderStatus::Online)
    }

    /// String form used in event payloads and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Online => "online",
            ProviderStatus::Offline => "offline",
            ProviderStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure categories for unsuccessful probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Connection-level failures (DNS, refused, reset)
    Network,
    /// Probe exceeded its deadline
    Timeout,
    /// Provider rejected the probe credentials
    Authentication,
    /// Anything that fits no other category
    Unknown,
}

impl ErrorCategory {
    /// String form used in event payloads and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a single health probe against one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthObservation {
    /// Provider identifier
    pub provider_id: String,
    /// Provider type tag from the registry (e.g. "openai")
    pub provider_type: String,
    /// Observed health status
    pub status: ProviderStatus,
    /// When the probe finished
    pub observed_at: DateTime<Utc>,
    /// Wall-clock duration of the probe attempt, measured for failures too
    pub response_time_ms: f64,
    /// Failure category, None when online
    pub error_category: Option<ErrorCategory>,
    /// Failure detail from the classifier, None when online
    pub error_detail: Option<String>,
    /// Endpoint that was probed, when known
    pub endpoint: Option<String>,
}

impl HealthObservation {
    /// Create an observation for a successful probe
    pub fn online(
        provider_id: impl Into<String>,
        provider_type: impl Into<String>,
        response_time_ms: f64,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            provider_type: provider_type.into(),
            status: ProviderStatus::Online,
            observed_at: Utc::now(),
            response_time_ms,
            error_category: None,
            error_detail: None,
            endpoint,
        }
    }

    /// Create an observation for a failed probe
    pub fn offline(
        provider_id: impl Into<String>,
        provider_type: impl Into<String>,
        response_time_ms: f64,
        category: ErrorCategory,
        detail: impl Into<String>,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            provider_type: provider_type.into(),
            status: ProviderStatus::Offline,
            observed_at: Utc::now(),
            response_time_ms,
            error_category: Some(category),
            error_detail: Some(detail.into()),
            endpoint,
        }
    }

    /// Check if the observation reports a healthy provider
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }

    /// Human-readable status message for event payloads
    pub fn status_message(&self) -> String {
        match &self.error_detail {
            None => "healthy".to_string(),
            Some(detail) => detail.clone(),
        }
    }
}
