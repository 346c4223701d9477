//! # Utility Modules
//!
//! Supporting utilities for logging, metrics and diagnostics.
//!
//! ## Components
//! - **Logging**: `tracing-subscriber` setup from [`crate::config::LoggingConfig`]
//! - **Metrics**: thread-safe decoder counters
//! - **Diagnostics**: human-readable rendering of captured messages

pub mod diagnostics;
pub mod logging;
pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot};
