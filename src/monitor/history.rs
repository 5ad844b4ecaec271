//! Per-provider health history and flap dampening
//!
//! This module keeps a bounded observation window per provider and decides
//! when a health state change is stable enough to publish. A provider must
//! produce a streak of consecutive identical observations before its
//! published state flips, so a single blip in either direction never
//! generates an event.

use super::types::ProviderStatus;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Default number of observations retained per provider
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Default streak length required to confirm a state change
pub const DEFAULT_CONFIRMATION_STREAK: usize = 3;

/// Health history for a single provider
#[derive(Debug, Clone)]
pub struct ProviderHealthHistory {
    /// Recent observations, oldest first - uses VecDeque for O(1) pop_front
    window: VecDeque<(ProviderStatus, DateTime<Utc>)>,
    /// Last state change that was confirmed and published
    last_published: Option<ProviderStatus>,
    /// Running average response time in milliseconds
    avg_response_time_ms: f64,
}

impl ProviderHealthHistory {
    fn new() -> Self {
        Self {
            window: VecDeque::new(),
            last_published: None,
            avg_response_time_ms: 0.0,
        }
    }
}

/// Read-only view of one provider's tracked state
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderHealthSnapshot {
    /// Last published status, None before the first confirmation
    pub last_published: Option<ProviderStatus>,
    /// Running average response time in milliseconds
    pub avg_response_time_ms: f64,
    /// Number of observations currently in the window
    pub observations: usize,
}

/// Tracks health histories for all providers and applies hysteresis
///
/// All state lives behind one coarse mutex. Record operations read the
/// window, evaluate the decision rule, and update the published state as a
/// single critical section, so concurrent recorders can never interleave
/// between evaluation and publication. The lock is never held across an
/// await point; recording is synchronous.
pub struct HealthHistoryTracker {
    window_size: usize,
    confirmation_streak: usize,
    histories: Mutex<HashMap<String, ProviderHealthHistory>>,
}

impl HealthHistoryTracker {
    /// Create a tracker with explicit window and streak settings
    pub fn new(window_size: usize, confirmation_streak: usize) -> Self {
        Self {
            window_size,
            confirmation_streak,
            histories: Mutex::new(HashMap::new()),
        }
    }

    /// Record one observation and decide whether to publish a state change.
    ///
    /// Returns true when the caller should emit a health-changed event:
    /// either this is the first observation ever for the provider, or the
    /// last `confirmation_streak` observations all agree on a status that
    /// differs from the last published one. Otherwise the observation only
    /// updates the window and running average.
    pub fn record(
        &self,
        provider_id: &str,
        status: ProviderStatus,
        response_time_ms: f64,
    ) -> bool {
        let mut histories = self.histories.lock();
        let history = histories
            .entry(provider_id.to_string())
            .or_insert_with(ProviderHealthHistory::new);

        // Running average folds in the new sample weighted by the window
        // occupancy before insertion. After the window is full this is no
        // longer a strict mean of the retained entries; the smoothing
        // behavior is intentional.
        let occupancy = history.window.len() as f64;
        history.avg_response_time_ms =
            (occupancy * history.avg_response_time_ms + response_time_ms) / (occupancy + 1.0);

        // Append and evict oldest beyond the window bound
        history.window.push_back((status, Utc::now()));
        while history.window.len() > self.window_size {
            history.window.pop_front();
        }

        match history.last_published {
            // First observation for this provider always publishes
            None => {
                history.last_published = Some(status);
                true
            }
            // No change from the published state, nothing to confirm
            Some(published) if published == status => false,
            Some(_) => {
                let confirmed = history.window.len() >= self.confirmation_streak
                    && history
                        .window
                        .iter()
                        .rev()
                        .take(self.confirmation_streak)
                        .all(|(s, _)| *s == status);
                if confirmed {
                    history.last_published = Some(status);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Last published status for a provider, None if never confirmed
    pub fn last_published(&self, provider_id: &str) -> Option<ProviderStatus> {
        self.histories
            .lock()
            .get(provider_id)
            .and_then(|h| h.last_published)
    }

    /// Running average response time for a provider, None if never observed
    pub fn average_response_time_ms(&self, provider_id: &str) -> Option<f64> {
        self.histories
            .lock()
            .get(provider_id)
            .map(|h| h.avg_response_time_ms)
    }

    /// Snapshot the tracked state of every provider
    pub fn snapshot(&self) -> HashMap<String, ProviderHealthSnapshot> {
        self.histories
            .lock()
            .iter()
            .map(|(id, h)| {
                (
                    id.clone(),
                    ProviderHealthSnapshot {
                        last_published: h.last_published,
                        avg_response_time_ms: h.avg_response_time_ms,
                        observations: h.window.len(),
                    },
                )
            })
            .collect()
    }

    /// Number of providers with tracked history
    pub fn tracked_providers(&self) -> usize {
        self.histories.lock().len()
    }
}

impl Default for HealthHistoryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE, DEFAULT_CONFIRMATION_STREAK)
    }
}
