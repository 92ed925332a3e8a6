use std::future::Future;

use crate::errors::EscalationError;
use crate::models::EscalationTicket;

/// The external human-review workflow that receives tickets.
pub trait IEscalationSink: Send + Sync + 'static {
    fn deliver(
        &self,
        ticket: &EscalationTicket,
    ) -> impl Future<Output = Result<(), EscalationError>> + Send;
}
