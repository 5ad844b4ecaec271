//! # providerwatch
//!
//! Health monitoring for third-party LLM API providers: periodic concurrent
//! probing, failure classification, and flap dampening so that only stable
//! health state transitions reach the event bus.
//!
//! ## Features
//!
//! - **Concurrent Probing**: Every monitored provider is probed in its own
//!   task each cycle, under a per-provider deadline
//! - **Failure Classification**: Probe failures map to network, timeout,
//!   authentication, or unknown categories
//! - **Flap Dampening**: A state change is published only after a streak of
//!   consecutive identical observations confirms it
//! - **Pluggable Seams**: Registry, probe, observation store, and event bus
//!   are traits; hosts wire in their own implementations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use providerwatch::{
//!     Config, HealthCheckScheduler, HealthHistoryTracker, HttpHealthProbe,
//!     MemoryObservationStore, NullEventBus, ProbeOrchestrator,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> providerwatch::Result<()> {
//!     let config = Config::from_file("config/providerwatch.yaml").await?;
//!
//!     let registry = Arc::new(config.registry());
//!     let probe = Arc::new(HttpHealthProbe::new()?);
//!     let store = Arc::new(MemoryObservationStore::new());
//!     let bus = Arc::new(NullEventBus::new());
//!     let tracker = Arc::new(HealthHistoryTracker::new(
//!         config.monitor.hysteresis.window_size,
//!         config.monitor.hysteresis.confirmation_streak,
//!     ));
//!
//!     let orchestrator = Arc::new(ProbeOrchestrator::new(
//!         registry, probe, store, bus, tracker, &config.monitor,
//!     ));
//!     let scheduler = HealthCheckScheduler::new(orchestrator, config.monitor.clone());
//!
//!     let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
//!     let handle = scheduler.spawn(stop_rx);
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     stop_tx.send(true).ok();
//!     handle.await.ok();
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

// Public module exports
pub mod config;
pub mod events;
pub mod monitor;
pub mod registry;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::{Config, HysteresisConfig, MonitorConfig, ProviderEntry};
pub use utils::error::{MonitorError, Result};

// Export the monitoring engine
pub use monitor::{
    CycleSummary, ErrorCategory, HealthCheckScheduler, HealthHistoryTracker, HealthObservation,
    HealthProbe, HttpHealthProbe, ProbeError, ProbeExecutor, ProbeOrchestrator, ProbeResult,
    ProviderHealthSnapshot, ProviderStatus,
};

// Export the seams and their bundled implementations
pub use events::{HealthEventBus, NullEventBus, ProviderHealthChanged, WebhookEventBus};
pub use registry::{
    ProviderMonitoringConfig, ProviderRegistry, RegisteredProvider, StaticProviderRegistry,
};
pub use storage::{JsonlObservationStore, MemoryObservationStore, ObservationStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, env!("CARGO_PKG_NAME"));
    }
}
