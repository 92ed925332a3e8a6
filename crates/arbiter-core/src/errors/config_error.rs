/// Startup/configuration validation errors. All of these are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("dimension weights sum to {sum}, expected 1.0 ± {epsilon}")]
    WeightSumInvalid { sum: f64, epsilon: f64 },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("config parse failed: {reason}")]
    ParseFailed { reason: String },
}
