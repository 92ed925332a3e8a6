use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Severity;

/// A human-review ticket for an escalated or blocked report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationTicket {
    pub id: String,
    pub report_id: String,
    pub priority: TicketPriority,
    pub conflicting_options: Vec<String>,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl From<Severity> for TicketPriority {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical => TicketPriority::Urgent,
            Severity::High => TicketPriority::High,
            Severity::Medium => TicketPriority::Normal,
            Severity::Low | Severity::None => TicketPriority::Low,
        }
    }
}

/// Ticket lifecycle. Only the external review workflow moves a ticket past `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InReview,
    Resolved,
    Dismissed,
}

impl TicketStatus {
    pub fn name(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InReview => "in_review",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Dismissed => "dismissed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Dismissed)
    }
}
