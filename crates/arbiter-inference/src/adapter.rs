//! InferenceAdapter: the single path from analyzers to a backend.
//!
//! Enforces the per-call timeout, rejects out-of-range responses, and serves
//! repeated pairs from the cache. It never retries and never guesses.

use std::time::Duration;

use arbiter_core::config::InferenceConfig;
use arbiter_core::errors::InferenceError;
use arbiter_core::models::Classification;
use arbiter_core::traits::IInferenceBackend;
use tracing::debug;

use crate::cache::ClassificationCache;

pub struct InferenceAdapter<B> {
    backend: B,
    call_timeout: Duration,
    cache: Option<ClassificationCache>,
}

impl<B: IInferenceBackend> InferenceAdapter<B> {
    pub fn new(backend: B, config: &InferenceConfig) -> Self {
        let cache = (config.cache_capacity > 0)
            .then(|| ClassificationCache::new(config.cache_capacity));
        Self {
            backend,
            call_timeout: Duration::from_millis(config.call_timeout_ms),
            cache,
        }
    }

    /// Adapter with no cache, for callers that need every call to reach the backend.
    pub fn uncached(backend: B, call_timeout: Duration) -> Self {
        Self {
            backend,
            call_timeout,
            cache: None,
        }
    }

    /// Classify `hypothesis` against `premise`.
    ///
    /// Returns `InferenceError::Timeout` if the backend exceeds the per-call
    /// budget and `MalformedResponse` if any score is outside [0, 1]. The
    /// budget covers the backend's own retries.
    pub async fn classify(
        &self,
        premise: &str,
        hypothesis: &str,
    ) -> Result<Classification, InferenceError> {
        let key = self
            .cache
            .as_ref()
            .map(|_| ClassificationCache::key(premise, hypothesis));

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key) {
                debug!(backend = self.backend.name(), "classification cache hit");
                return Ok(hit);
            }
        }

        let classification =
            match tokio::time::timeout(self.call_timeout, self.backend.classify(premise, hypothesis))
                .await
            {
                Ok(result) => result?,
                Err(_) => {
                    return Err(InferenceError::Timeout {
                        backend: self.backend.name().to_string(),
                        timeout_ms: self.call_timeout.as_millis() as u64,
                    })
                }
            };

        classification
            .validate()
            .map_err(|reason| InferenceError::MalformedResponse {
                backend: self.backend.name().to_string(),
                reason,
            })?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, classification);
        }

        Ok(classification)
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Number of cached classifications (0 when caching is disabled).
    pub fn cached_pairs(&self) -> u64 {
        self.cache.as_ref().map(|c| c.len()).unwrap_or(0)
    }
}
