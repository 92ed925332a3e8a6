use serde::{Deserialize, Serialize};

use super::defaults;

/// Concurrency and degradation settings for the dimension analyzers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum concurrent backend calls made by the pairwise analyzer. Default: 8.
    pub pairwise_worker_pool_size: usize,
    /// Wall-clock budget for each analyzer. Default: 10_000.
    pub analyzer_timeout_ms: u64,
    /// Confidence forced onto a degraded dimension result. Default: 0.3.
    pub degraded_confidence_floor: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pairwise_worker_pool_size: defaults::DEFAULT_PAIRWISE_WORKER_POOL_SIZE,
            analyzer_timeout_ms: defaults::DEFAULT_ANALYZER_TIMEOUT_MS,
            degraded_confidence_floor: defaults::DEFAULT_DEGRADED_CONFIDENCE_FLOOR,
        }
    }
}
