use serde::{Deserialize, Serialize};

use super::defaults;

/// The fail-safe knobs of the decision gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Overall score above which a report escalates. Default: 0.35.
    pub score_threshold: f64,
    /// Aggregate confidence below which a report escalates. Default: 0.8.
    pub confidence_floor: f64,
    /// Safety score at or above which the safety dimension is critical. Default: 0.9.
    pub safety_saturation: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            score_threshold: defaults::DEFAULT_SCORE_THRESHOLD,
            confidence_floor: defaults::DEFAULT_CONFIDENCE_FLOOR,
            safety_saturation: defaults::DEFAULT_SAFETY_SATURATION,
        }
    }
}
