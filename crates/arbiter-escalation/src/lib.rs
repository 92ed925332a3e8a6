//! # arbiter-escalation
//!
//! Review tickets for reports the gate did not auto-approve. One ticket per
//! report id, however many times the report is enqueued. Delivery to the
//! external review workflow happens on a background dispatcher; when its
//! channel is full, tickets wait in an overflow backlog instead of being
//! dropped or blocking arbitration.

pub mod queue;
pub mod sink;

pub use queue::{EnqueueOutcome, EscalationQueue, EscalationStats};
pub use sink::TracingSink;
