use arbiter_core::models::*;
use proptest::prelude::*;

fn classification(entailment: f64, contradiction: f64, confidence: f64) -> Classification {
    Classification {
        entailment,
        contradiction,
        neutral: 0.0,
        confidence,
    }
}

#[test]
fn contradiction_above_threshold_scores_its_value() {
    let c = classification(0.1, 0.9, 0.8);
    assert_eq!(c.relation(), PairRelation::Contradiction);
    assert_eq!(c.pair_score(), 0.9);
}

#[test]
fn entailment_scores_complement() {
    let c = classification(0.95, 0.02, 0.9);
    assert_eq!(c.relation(), PairRelation::Entailment);
    assert!((c.pair_score() - 0.05).abs() < 1e-12);
}

#[test]
fn neither_threshold_is_neutral_flat_score() {
    let c = classification(0.6, 0.6, 0.9);
    assert_eq!(c.relation(), PairRelation::Neutral);
    assert_eq!(c.pair_score(), 0.2);
}

#[test]
fn contradiction_wins_when_both_exceed_threshold() {
    let c = classification(0.8, 0.7, 0.9);
    assert_eq!(c.relation(), PairRelation::Contradiction);
}

#[test]
fn validate_rejects_out_of_range_and_nan() {
    assert!(classification(1.2, 0.0, 0.5).validate().is_err());
    assert!(classification(0.2, f64::NAN, 0.5).validate().is_err());
    assert!(classification(0.2, 0.1, -0.1).validate().is_err());
    assert!(classification(0.2, 0.1, 0.5).validate().is_ok());
}

#[test]
fn ticket_priority_follows_severity() {
    assert_eq!(TicketPriority::from(Severity::Critical), TicketPriority::Urgent);
    assert_eq!(TicketPriority::from(Severity::High), TicketPriority::High);
    assert_eq!(TicketPriority::from(Severity::Medium), TicketPriority::Normal);
    assert_eq!(TicketPriority::from(Severity::None), TicketPriority::Low);
}

#[test]
fn severity_orders_critical_highest() {
    let worst = [Severity::Low, Severity::Critical, Severity::Medium]
        .into_iter()
        .max()
        .unwrap();
    assert!(worst.is_critical());
}

#[test]
fn decision_serializes_screaming_case() {
    let json = serde_json::to_string(&Decision::EscalateHitl).unwrap();
    assert_eq!(json, "\"ESCALATE_HITL\"");
    assert!(Decision::Block.requires_escalation());
    assert!(!Decision::AutoApprove.requires_escalation());
}

#[test]
fn source_kind_defaults_to_free_text_when_absent() {
    let json = r#"{
        "source_id": "a",
        "text": "Torque to 35 ft-lb",
        "self_reported_confidence": 0.9,
        "produced_at": "2026-01-01T00:00:00Z"
    }"#;
    let source: SourceResponse = serde_json::from_str(json).unwrap();
    assert_eq!(source.kind, SourceKind::FreeText);
    assert!(source.measurements().is_empty());
}

#[test]
fn report_conflicting_options_are_labelled_by_dimension() {
    let mut safety = DimensionResult::new(Dimension::Safety, 1.0, 1.0);
    safety.contradictions.push("energized vs de-energized".into());
    let report = ContradictionReport {
        id: "r1".into(),
        overall_score: 0.4,
        per_dimension: vec![safety, DimensionResult::vacuous(Dimension::Factual)],
        aggregate_confidence: 1.0,
        decision: Decision::Block,
        max_severity: Severity::Critical,
        reasons: vec![GateReason::CriticalFinding {
            dimension: Dimension::Safety,
        }],
        degradations: vec![],
        supersedes: None,
        source_ids: vec!["a".into(), "b".into()],
        created_at: chrono::Utc::now(),
    };
    assert_eq!(
        report.conflicting_options(),
        vec!["[safety] energized vs de-energized".to_string()]
    );
    assert!(report.dimension(Dimension::Factual).is_some());
    assert!(report.dimension(Dimension::Pairwise).is_none());
}

proptest! {
    #[test]
    fn pair_score_stays_in_unit_interval(
        e in 0.0f64..=1.0,
        c in 0.0f64..=1.0,
        n in 0.0f64..=1.0,
        conf in 0.0f64..=1.0,
    ) {
        let cls = Classification { entailment: e, contradiction: c, neutral: n, confidence: conf };
        prop_assert!(cls.validate().is_ok());
        let s = cls.pair_score();
        prop_assert!((0.0..=1.0).contains(&s));
    }
}
