//! Built-in escalation sinks.

use arbiter_core::errors::EscalationError;
use arbiter_core::models::EscalationTicket;
use arbiter_core::traits::IEscalationSink;
use tracing::info;

/// Sink that only logs each ticket. Used when no review workflow is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl IEscalationSink for TracingSink {
    async fn deliver(&self, ticket: &EscalationTicket) -> Result<(), EscalationError> {
        info!(
            ticket_id = %ticket.id,
            report_id = %ticket.report_id,
            priority = ?ticket.priority,
            options = ticket.conflicting_options.len(),
            "escalation ticket ready for review"
        );
        Ok(())
    }
}
