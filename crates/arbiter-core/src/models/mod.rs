mod classification;
mod degradation_event;
mod dimension;
mod ledger_entry;
mod reference_fact;
mod report;
mod severity;
mod source;
mod ticket;

pub use classification::{Classification, PairRelation};
pub use degradation_event::DegradationEvent;
pub use dimension::{clamp_unit, Dimension, DimensionResult, DimensionResults, PartialDimensionResults};
pub use ledger_entry::{LedgerEntry, LedgerEntryType};
pub use reference_fact::{DeclaredMeasurement, PhysicalLaw, ReferenceFact, ReferenceFinding};
pub use report::{ContradictionReport, Decision, GateReason};
pub use severity::Severity;
pub use source::{SourceKind, SourceResponse};
pub use ticket::{EscalationTicket, TicketPriority, TicketStatus};
