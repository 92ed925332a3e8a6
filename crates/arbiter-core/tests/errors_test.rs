use arbiter_core::errors::*;

#[test]
fn weight_sum_invalid_carries_sum() {
    let err = ConfigError::WeightSumInvalid {
        sum: 0.95,
        epsilon: 1e-6,
    };
    assert!(err.to_string().contains("0.95"));
}

#[test]
fn inference_error_exposes_backend_name() {
    let err = InferenceError::Timeout {
        backend: "nli-large".into(),
        timeout_ms: 3000,
    };
    assert_eq!(err.backend(), "nli-large");
    assert!(err.to_string().contains("3000ms"));
}

#[test]
fn ledger_write_failure_is_fail_closed() {
    let err: ArbiterError = LedgerError::WriteFailure {
        attempts: 3,
        reason: "disk full".into(),
    }
    .into();
    assert!(err.is_fail_closed());
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn ledger_halted_is_fail_closed() {
    let err: ArbiterError = LedgerError::Halted { sequence: 7 }.into();
    assert!(err.is_fail_closed());
}

#[test]
fn config_error_is_not_fail_closed() {
    let err: ArbiterError = ConfigError::ParseFailed {
        reason: "bad".into(),
    }
    .into();
    assert!(!err.is_fail_closed());
}

#[test]
fn escalation_queue_full_carries_pending_count() {
    let err = EscalationError::QueueFull { pending: 42 };
    assert!(err.to_string().contains("42"));
}
