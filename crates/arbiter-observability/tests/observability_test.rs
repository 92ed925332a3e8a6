use arbiter_core::models::{
    ContradictionReport, Decision, DegradationEvent, Dimension, DimensionResult, GateReason,
    Severity,
};
use arbiter_observability::tracing_setup::{events, init_tracing, spans};
use arbiter_observability::{ArbitrationMetrics, MetricsSnapshot};
use chrono::Utc;

fn report() -> ContradictionReport {
    ContradictionReport {
        id: "r-1".into(),
        overall_score: 0.4,
        per_dimension: vec![DimensionResult::new(Dimension::Factual, 0.8, 1.0)
            .with_contradictions(vec!["torque: 35 vs 50 N·m".into()])
            .with_severity(Severity::Medium)],
        aggregate_confidence: 0.9,
        decision: Decision::EscalateHitl,
        max_severity: Severity::Medium,
        reasons: vec![GateReason::WithinTolerance],
        degradations: vec![DegradationEvent::now("pairwise", "timed out", "lexical overlap")],
        supersedes: None,
        source_ids: vec!["a".into(), "b".into()],
        created_at: Utc::now(),
    }
}

#[test]
fn init_is_idempotent() {
    init_tracing("debug");
    // The second call never installs anything.
    assert!(!init_tracing("debug"));
}

#[test]
fn events_and_spans_emit_without_panicking() {
    init_tracing("debug");
    let r = report();
    let span = arbiter_observability::arbitration_span!(r.id, r.source_ids.len());
    let _guard = span.enter();
    let _analyze = arbiter_observability::analyzer_span!(Dimension::Safety).entered();
    events::arbitration_decided(&r, 12);
    events::contradiction_detected(&r);
    events::degradation_triggered(&r.degradations[0]);
    events::ledger_appended(&r.id, 0, "decision");
    events::ledger_halted(&r.id, "disk full");
    events::input_rejected("duplicate source id");
    assert_eq!(spans::names::ARBITRATE, "arbiter.arbitrate");
}

#[test]
fn snapshot_serializes_to_json() {
    let m = ArbitrationMetrics::new();
    m.record_decision(Decision::EscalateHitl, 1, 8);
    let json = serde_json::to_value(m.snapshot()).unwrap();
    assert_eq!(json["escalated"], 1);
    assert_eq!(json["degraded_dimensions"], 1);
    let back: MetricsSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, m.snapshot());
}
