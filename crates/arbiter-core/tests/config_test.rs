use arbiter_core::config::*;
use arbiter_core::errors::ConfigError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = ArbiterConfig::from_toml("").unwrap();

    // Weights
    assert_eq!(config.weights.safety, 0.40);
    assert_eq!(config.weights.factual, 0.25);
    assert_eq!(config.weights.procedure, 0.20);
    assert_eq!(config.weights.semantic, 0.10);
    assert_eq!(config.weights.pairwise, 0.05);

    // Gate
    assert_eq!(config.gate.score_threshold, 0.35);
    assert_eq!(config.gate.confidence_floor, 0.8);
    assert_eq!(config.gate.safety_saturation, 0.9);

    // Analysis
    assert_eq!(config.analysis.pairwise_worker_pool_size, 8);
    assert_eq!(config.analysis.degraded_confidence_floor, 0.3);

    // Ledger
    assert_eq!(config.ledger.max_write_attempts, 3);
    assert!(config.ledger.db_path.is_none());

    assert_eq!(config.observability.log_level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[gate]
score_threshold = 0.5

[analysis]
pairwise_worker_pool_size = 2
analyzer_timeout_ms = 250
"#;
    let config = ArbiterConfig::from_toml(toml).unwrap();
    assert_eq!(config.gate.score_threshold, 0.5);
    assert_eq!(config.gate.confidence_floor, 0.8); // default
    assert_eq!(config.analysis.pairwise_worker_pool_size, 2);
    assert_eq!(config.analysis.analyzer_timeout_ms, 250);
    assert_eq!(config.analysis.degraded_confidence_floor, 0.3); // default
}

#[test]
fn weights_not_summing_to_one_are_rejected() {
    let toml = r#"
[weights]
safety = 0.5
factual = 0.25
procedure = 0.20
semantic = 0.10
pairwise = 0.05
"#;
    let config = ArbiterConfig::from_toml(toml).unwrap();
    match config.validate() {
        Err(ConfigError::WeightSumInvalid { sum, .. }) => assert!((sum - 1.1).abs() < 1e-9),
        other => panic!("expected WeightSumInvalid, got {other:?}"),
    }
}

#[test]
fn weights_within_epsilon_are_accepted() {
    let weights = DimensionWeights {
        safety: 0.40 + 5e-7,
        ..DimensionWeights::default()
    };
    assert!(weights.validate().is_ok());
}

#[test]
fn negative_weight_is_rejected_even_if_sum_is_one() {
    let weights = DimensionWeights {
        safety: 0.50,
        pairwise: -0.05,
        ..DimensionWeights::default()
    };
    assert!(matches!(
        weights.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn out_of_range_threshold_is_rejected() {
    let mut config = ArbiterConfig::default();
    config.gate.confidence_floor = 1.5;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("gate.confidence_floor"));
}

#[test]
fn zero_pool_size_is_rejected() {
    let mut config = ArbiterConfig::default();
    config.analysis.pairwise_worker_pool_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn malformed_toml_reports_parse_failure() {
    let err = ArbiterConfig::from_toml("[gate\nscore_threshold = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed { .. }));
}

#[test]
fn config_serde_roundtrip() {
    let config = ArbiterConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = ArbiterConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.weights, config.weights);
    assert_eq!(
        roundtripped.analysis.analyzer_timeout_ms,
        config.analysis.analyzer_timeout_ms
    );
}
