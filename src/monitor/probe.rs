//! Probe execution and failure classification
//!
//! This module defines the probe capability used to check a single provider,
//! the probe error type with its failure classifier, and the executor that
//! turns probe outcomes into health observations.

use super::types::{ErrorCategory, HealthObservation};
use crate::registry::RegisteredProvider;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Result type alias for probe implementations
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Errors produced by health probes
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Connection-level failures (DNS, refused, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Probe exceeded its deadline
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Provider rejected the probe credentials
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Failures that fit no other category
    #[error("Probe error: {0}")]
    Other(String),
}

impl ProbeError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create an uncategorized error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Classify this error into a failure category.
    ///
    /// Total mapping: every probe error lands in exactly one category and
    /// unrecognized failures classify as unknown rather than erroring.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProbeError::Network(_) => ErrorCategory::Network,
            ProbeError::Timeout(_) => ErrorCategory::Timeout,
            ProbeError::Authentication(_) => ErrorCategory::Authentication,
            ProbeError::Other(_) => ErrorCategory::Unknown,
        }
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Capability to check the health of a single provider
///
/// Implementations cover one probing protocol; per-provider details stay
/// behind this seam so the orchestrator never sees them.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Probe the provider once, returning Ok on a healthy response
    async fn check(&self, provider: &RegisteredProvider) -> ProbeResult<()>;
}

/// Runs probes under a deadline and converts outcomes into observations
#[derive(Clone)]
pub struct ProbeExecutor {
    probe: Arc<dyn HealthProbe>,
}

impl ProbeExecutor {
    /// Create an executor around a probe implementation
    pub fn new(probe: Arc<dyn HealthProbe>) -> Self {
        Self { probe }
    }

    /// Execute one probe against a provider with the given deadline.
    ///
    /// Never fails: probe errors and deadline overruns become offline
    /// observations with a failure category. Elapsed time is measured
    /// around the whole attempt so failed probes report latency too.
    pub async fn execute(
        &self,
        provider: &RegisteredProvider,
        timeout: Duration,
    ) -> HealthObservation {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(timeout, self.probe.check(provider)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::timeout(format!(
                "health check exceeded {:.1}s deadline",
                timeout.as_secs_f64()
            ))),
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(()) => {
                debug!(
                    "Provider {} responded in {:.1}ms",
                    provider.id, elapsed_ms
                );
                HealthObservation::online(
                    &provider.id,
                    &provider.provider_type,
                    elapsed_ms,
                    provider.endpoint.clone(),
                )
            }
            Err(e) => {
                debug!(
                    "Provider {} probe failed after {:.1}ms: {}",
                    provider.id, elapsed_ms, e
                );
                HealthObservation::offline(
                    &provider.id,
                    &provider.provider_type,
                    elapsed_ms,
                    e.category(),
                    e.to_string(),
                    provider.endpoint.clone(),
                )
            }
        }
    }
}

/// Generic HTTP reachability probe
///
/// Issues a GET against the provider's endpoint with an optional bearer
/// credential. Any 2xx response counts as healthy; 401/403 map to
/// authentication failures and other statuses to network failures.
pub struct HttpHealthProbe {
    client: reqwest::Client,
}

impl HttpHealthProbe {
    /// Create a probe with a default HTTP client
    pub fn new() -> ProbeResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent("providerwatch/0.1")
            .build()
            .map_err(|e| ProbeError::network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Create a probe around an existing HTTP client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn check(&self, provider: &RegisteredProvider) -> ProbeResult<()> {
        let endpoint = provider
            .endpoint
            .as_deref()
            .ok_or_else(|| ProbeError::other("provider has no endpoint configured"))?;

        let mut request = self.client.get(endpoint);
        if let Some(api_key) = &provider.api_key {
            request = request.bearer_auth(api_key);
        }

        // reqwest transport errors map via From: timeouts vs everything else
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ProbeError::authentication(format!(
                "provider rejected credentials with status {}",
                status.as_u16()
            )))
        } else {
            Err(ProbeError::network(format!(
                "provider returned status {}",
                status.as_u16()
            )))
        }
    }
}
