//! # arbiter-observability
//!
//! Tracing subscriber setup, the structured events and spans every crate
//! logs through, and process-wide decision counters.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{ArbitrationMetrics, MetricsSnapshot};
