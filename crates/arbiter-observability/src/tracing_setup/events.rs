//! Structured log events for arbitration operations.
//!
//! Every event carries an `event` field so log pipelines can filter on it
//! without parsing the message.

use arbiter_core::models::{ContradictionReport, DegradationEvent, EscalationTicket};

pub fn arbitration_decided(report: &ContradictionReport, elapsed_ms: u64) {
    tracing::info!(
        event = "arbitration_decided",
        report_id = %report.id,
        decision = report.decision.name(),
        overall_score = report.overall_score,
        aggregate_confidence = report.aggregate_confidence,
        max_severity = report.max_severity.name(),
        sources = report.source_ids.len(),
        degraded = report.degradations.len(),
        elapsed_ms,
        "arbitration decided"
    );
}

/// One line per dimension that found anything.
pub fn contradiction_detected(report: &ContradictionReport) {
    for result in report.per_dimension.iter().filter(|r| !r.contradictions.is_empty()) {
        tracing::debug!(
            event = "contradiction_detected",
            report_id = %report.id,
            dimension = result.dimension.name(),
            score = result.score,
            severity = result.severity.name(),
            count = result.contradictions.len(),
            "contradiction detected"
        );
    }
}

pub fn degradation_triggered(event: &DegradationEvent) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %event.component,
        failure = %event.failure,
        fallback = %event.fallback_used,
        "degradation triggered"
    );
}

pub fn ledger_appended(report_id: &str, sequence: u64, entry_type: &str) {
    tracing::debug!(
        event = "ledger_appended",
        report_id,
        sequence,
        entry_type,
        "decision recorded"
    );
}

pub fn ledger_halted(report_id: &str, reason: &str) {
    tracing::error!(
        event = "ledger_halted",
        report_id,
        reason,
        "ledger write failed; arbitration is fail-closed"
    );
}

pub fn escalation_enqueued(ticket: &EscalationTicket) {
    tracing::info!(
        event = "escalation_enqueued",
        ticket_id = %ticket.id,
        report_id = %ticket.report_id,
        priority = ?ticket.priority,
        "escalation enqueued"
    );
}

pub fn escalation_backlogged(ticket: &EscalationTicket, backlog: usize) {
    tracing::warn!(
        event = "escalation_backlogged",
        ticket_id = %ticket.id,
        report_id = %ticket.report_id,
        backlog,
        "escalation channel full; ticket waiting in backlog"
    );
}

pub fn input_rejected(reason: &str) {
    tracing::warn!(event = "input_rejected", reason, "arbitration input rejected");
}
