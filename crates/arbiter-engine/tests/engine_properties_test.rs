//! Score bounds and gate consistency over generated source sets.

use arbiter_core::config::ArbiterConfig;
use arbiter_core::models::{Decision, GateReason};
use arbiter_engine::ArbitrationEngine;
use proptest::prelude::*;
use test_fixtures::backends::ScriptedBackend;
use test_fixtures::sources;

const FRAGMENTS: &[&str] = &[
    "De-energize before testing.",
    "Test with power on.",
    "Torque the lugs to 35 ft-lb.",
    "Torque the lugs to 45 ft-lb.",
    "Connect the ground cable to the main bus bar.",
    "Disconnect the ground cable from the main bus bar.",
    "Wear insulated gloves.",
    "Gloves are not required.",
    "Open the breaker.",
    "Verify the breaker is closed.",
    "Set the supply to 480 V.",
    "Set the supply to 240 V.",
];

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 1..4).prop_map(|parts| parts.join(" "))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn scores_stay_bounded_and_the_gate_agrees(texts in prop::collection::vec(text(), 0..5)) {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let report = runtime().block_on(async {
            let engine = ArbitrationEngine::new(ScriptedBackend::new(), ArbiterConfig::default()).unwrap();
            engine.arbitrate(&sources(&refs)).await.unwrap()
        });

        prop_assert!((0.0..=1.0).contains(&report.overall_score));
        prop_assert!((0.0..=1.0).contains(&report.aggregate_confidence));
        prop_assert_eq!(report.per_dimension.len(), 5);

        if refs.len() < 2 {
            prop_assert_eq!(report.decision, Decision::AutoApprove);
            prop_assert_eq!(report.overall_score, 0.0);
        }
        let critical = report
            .reasons
            .iter()
            .any(|r| matches!(r, GateReason::CriticalFinding { .. }));
        prop_assert_eq!(report.decision == Decision::Block, critical);
        if report.decision == Decision::AutoApprove && refs.len() >= 2 {
            prop_assert!(report.overall_score <= 0.35);
            prop_assert!(report.aggregate_confidence >= 0.8);
        }
    }

    #[test]
    fn source_order_does_not_change_the_decision(texts in prop::collection::vec(text(), 2..5)) {
        let forward: Vec<&str> = texts.iter().map(String::as_str).collect();
        let backward: Vec<&str> = forward.iter().rev().copied().collect();
        let (a, b) = runtime().block_on(async {
            let engine = ArbitrationEngine::new(ScriptedBackend::new(), ArbiterConfig::default()).unwrap();
            let a = engine.arbitrate(&sources(&forward)).await.unwrap();
            let b = engine.arbitrate(&sources(&backward)).await.unwrap();
            (a, b)
        });
        prop_assert_eq!(a.decision, b.decision);
        prop_assert!((a.overall_score - b.overall_score).abs() < 1e-9);
    }
}
