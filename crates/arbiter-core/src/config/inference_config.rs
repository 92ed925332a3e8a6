use serde::{Deserialize, Serialize};

use super::defaults;

/// Inference backend adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Budget for one classification, HTTP retries included. Default: 3_000.
    pub call_timeout_ms: u64,
    /// Entries in the classification cache; 0 disables it. Default: 10_000.
    pub cache_capacity: u64,
    /// Retries performed by HTTP backends before reporting unavailability. Default: 0.
    pub max_retries: u32,
    /// Endpoint for the HTTP backend, if one is used.
    pub endpoint: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: defaults::DEFAULT_INFERENCE_CALL_TIMEOUT_MS,
            cache_capacity: defaults::DEFAULT_INFERENCE_CACHE_CAPACITY,
            max_retries: defaults::DEFAULT_INFERENCE_MAX_RETRIES,
            endpoint: None,
        }
    }
}
