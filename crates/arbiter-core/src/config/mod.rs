//! Engine configuration.
//!
//! # Examples
//!
//! ```
//! use arbiter_core::config::ArbiterConfig;
//!
//! let config = ArbiterConfig::from_toml("[gate]\nscore_threshold = 0.3").unwrap();
//! assert!((config.gate.score_threshold - 0.3).abs() < f64::EPSILON);
//! assert!(config.validate().is_ok());
//! ```

mod analysis_config;
pub mod defaults;
mod escalation_config;
mod gate_config;
mod inference_config;
mod ledger_config;
mod observability_config;
mod weights_config;

pub use analysis_config::AnalysisConfig;
pub use escalation_config::EscalationConfig;
pub use gate_config::GateConfig;
pub use inference_config::InferenceConfig;
pub use ledger_config::LedgerConfig;
pub use observability_config::ObservabilityConfig;
pub use weights_config::DimensionWeights;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    pub weights: DimensionWeights,
    pub gate: GateConfig,
    pub analysis: AnalysisConfig,
    pub inference: InferenceConfig,
    pub ledger: LedgerConfig,
    pub escalation: EscalationConfig,
    pub observability: ObservabilityConfig,
}

impl ArbiterConfig {
    /// Parse a TOML document. Missing sections and fields take defaults.
    /// Parsing does not validate; call [`validate`](Self::validate).
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })
    }

    /// Reject any configuration the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;

        unit_interval("gate.score_threshold", self.gate.score_threshold)?;
        unit_interval("gate.confidence_floor", self.gate.confidence_floor)?;
        unit_interval("gate.safety_saturation", self.gate.safety_saturation)?;
        unit_interval(
            "analysis.degraded_confidence_floor",
            self.analysis.degraded_confidence_floor,
        )?;

        positive(
            "analysis.pairwise_worker_pool_size",
            self.analysis.pairwise_worker_pool_size as u64,
        )?;
        positive(
            "analysis.analyzer_timeout_ms",
            self.analysis.analyzer_timeout_ms,
        )?;
        positive("inference.call_timeout_ms", self.inference.call_timeout_ms)?;
        positive(
            "ledger.max_write_attempts",
            u64::from(self.ledger.max_write_attempts),
        )?;
        positive(
            "escalation.channel_capacity",
            self.escalation.channel_capacity as u64,
        )?;

        Ok(())
    }
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}

fn positive(field: &str, value: u64) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must be greater than zero".to_string(),
        })
    }
}
