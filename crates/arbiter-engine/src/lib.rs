//! # arbiter-engine
//!
//! The arbitration pipeline: five analyzers run concurrently, the aggregator
//! joins them by label, the decision gate routes the result, every report is
//! written to the evidence ledger, and non-approved reports open a review
//! ticket.

pub mod aggregator;
pub mod context;
pub mod engine;
pub mod gate;

pub use aggregator::Aggregate;
pub use context::ArbitrationContext;
pub use engine::ArbitrationEngine;
pub use gate::{DecisionGate, GateOutcome};
