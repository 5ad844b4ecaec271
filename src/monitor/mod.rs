//! Provider health monitoring
//!
//! This module contains the monitoring engine: probe execution with failure
//! classification, per-provider history with flap dampening, cycle
//! orchestration, periodic scheduling, and event publication.

pub mod history;
pub mod orchestrator;
pub mod probe;
pub mod publisher;
pub mod scheduler;
pub mod types;


pub use history::{
    DEFAULT_CONFIRMATION_STREAK, DEFAULT_WINDOW_SIZE, HealthHistoryTracker,
    ProviderHealthSnapshot,
};
pub use orchestrator::{CycleSummary, ProbeOrchestrator};
pub use probe::{HealthProbe, HttpHealthProbe, ProbeError, ProbeExecutor, ProbeResult};
pub use publisher::HealthEventPublisher;
pub use scheduler::HealthCheckScheduler;
pub use types::{ErrorCategory, HealthObservation, ProviderStatus};
