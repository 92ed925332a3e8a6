/// Escalation queue errors.
#[derive(Debug, thiserror::Error)]
pub enum EscalationError {
    #[error("escalation channel full: {pending} tickets waiting for delivery")]
    QueueFull { pending: usize },

    #[error("report {report_id} was auto-approved and cannot be escalated")]
    NotEscalatable { report_id: String },

    #[error("ticket not found: {ticket_id}")]
    TicketNotFound { ticket_id: String },

    #[error("ticket {ticket_id} is already {status} and cannot change")]
    TicketClosed { ticket_id: String, status: String },

    #[error("ticket delivery failed: {reason}")]
    DeliveryFailed { reason: String },
}
