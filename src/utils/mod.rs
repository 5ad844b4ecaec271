//! Utility modules for the health monitor

pub mod error;

pub use error::{MonitorError, Result};
