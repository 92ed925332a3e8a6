//! HTTP NLI backend.
//!
//! Posts `{premise, hypothesis}` as JSON and expects
//! `{entailment, contradiction, neutral, confidence}` back. Optional retry
//! with exponential backoff is part of this backend's own contract; the
//! analyzers above it never retry.
//!
//! The adapter's per-call timeout bounds the whole retry loop, so each
//! attempt gets its share of that budget after the backoff sleeps.

use std::time::Duration;

use arbiter_core::config::InferenceConfig;
use arbiter_core::errors::InferenceError;
use arbiter_core::models::Classification;
use arbiter_core::traits::IInferenceBackend;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const RETRY_BACKOFF_BASE_MS: u64 = 100;

/// Sleep before retry `attempt` (1-based).
fn retry_backoff(attempt: u32) -> Duration {
    Duration::from_millis(RETRY_BACKOFF_BASE_MS.saturating_mul(2u64.saturating_pow(attempt - 1)))
}

/// Per-request timeout that lets `max_retries + 1` attempts and their
/// backoff sleeps fit inside `call_budget`. Never below 1 ms.
pub fn per_attempt_timeout(call_budget: Duration, max_retries: u32) -> Duration {
    let backoff: Duration = (1..=max_retries).map(retry_backoff).sum();
    let attempts = max_retries.saturating_add(1);
    (call_budget.saturating_sub(backoff) / attempts).max(Duration::from_millis(1))
}

pub struct HttpInferenceBackend {
    name: String,
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
    attempt_timeout: Duration,
    max_retries: u32,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    premise: &'a str,
    hypothesis: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    entailment: f64,
    contradiction: f64,
    neutral: f64,
    confidence: f64,
}

impl HttpInferenceBackend {
    /// `timeout` applies to each HTTP attempt on its own.
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Unavailable {
                backend: name.clone(),
                reason: format!("client build failed: {e}"),
            })?;
        Ok(Self {
            name,
            endpoint: endpoint.into(),
            api_key: None,
            client,
            attempt_timeout: timeout,
            max_retries: 0,
        })
    }

    /// Build from the `[inference]` config section. Requires `endpoint`.
    ///
    /// `call_timeout_ms` is the budget for the whole call, retries included;
    /// each attempt is capped by [`per_attempt_timeout`].
    pub fn from_config(
        name: impl Into<String>,
        config: &InferenceConfig,
    ) -> Result<Self, InferenceError> {
        let name = name.into();
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| InferenceError::Unavailable {
                backend: name.clone(),
                reason: "no endpoint configured".to_string(),
            })?;
        let attempt_timeout =
            per_attempt_timeout(Duration::from_millis(config.call_timeout_ms), config.max_retries);
        Ok(Self::new(name, endpoint, attempt_timeout)?.with_max_retries(config.max_retries))
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    async fn send_once(&self, body: &ClassifyRequest<'_>) -> Result<Classification, InferenceError> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable {
                backend: self.name.clone(),
                reason: format!("HTTP error: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Unavailable {
                backend: self.name.clone(),
                reason: format!("backend returned {status}: {body}"),
            });
        }

        let parsed: ClassifyResponse =
            response
                .json()
                .await
                .map_err(|e| InferenceError::MalformedResponse {
                    backend: self.name.clone(),
                    reason: format!("JSON parse error: {e}"),
                })?;

        Ok(Classification {
            entailment: parsed.entailment,
            contradiction: parsed.contradiction,
            neutral: parsed.neutral,
            confidence: parsed.confidence,
        })
    }
}

impl IInferenceBackend for HttpInferenceBackend {
    async fn classify(
        &self,
        premise: &str,
        hypothesis: &str,
    ) -> Result<Classification, InferenceError> {
        let body = ClassifyRequest {
            premise,
            hypothesis,
        };

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(retry_backoff(attempt)).await;
                debug!(attempt, backend = %self.name, "retrying classification request");
            }

            match self.send_once(&body).await {
                Ok(classification) => return Ok(classification),
                // A malformed body will not improve on retry.
                Err(e @ InferenceError::MalformedResponse { .. }) => return Err(e),
                Err(e) => {
                    warn!(attempt, backend = %self.name, error = %e, "classification request failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| InferenceError::Unavailable {
            backend: self.name.clone(),
            reason: "all retries exhausted".to_string(),
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_endpoint() {
        let config = InferenceConfig::default();
        let err = HttpInferenceBackend::from_config("nli", &config)
            .err()
            .expect("missing endpoint must fail");
        assert!(err.to_string().contains("no endpoint"));
    }

    #[test]
    fn from_config_carries_retries_and_endpoint() {
        let config = InferenceConfig {
            endpoint: Some("http://localhost:8080/classify".into()),
            max_retries: 2,
            ..InferenceConfig::default()
        };
        let backend = HttpInferenceBackend::from_config("nli", &config).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:8080/classify");
        assert_eq!(backend.max_retries, 2);
        assert_eq!(backend.name(), "nli");
        assert!(backend.attempt_timeout() < Duration::from_millis(config.call_timeout_ms));
    }

    #[test]
    fn attempts_and_backoff_fit_inside_the_call_budget() {
        let budget = Duration::from_millis(2000);
        // 100 + 200 ms of backoff, 1700 ms split over three attempts.
        let each = per_attempt_timeout(budget, 2);
        assert_eq!(each, Duration::from_millis(1700) / 3);
        assert!(each * 3 + retry_backoff(1) + retry_backoff(2) <= budget);

        assert_eq!(per_attempt_timeout(budget, 0), budget);
        assert_eq!(per_attempt_timeout(Duration::from_millis(50), 3), Duration::from_millis(1));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable_not_zero() {
        // Port 9 (discard) is closed on test hosts; the connect is refused.
        let backend =
            HttpInferenceBackend::new("nli", "http://127.0.0.1:9/classify", Duration::from_secs(2))
                .unwrap();
        let err = backend.classify("a", "b").await.unwrap_err();
        assert!(matches!(err, InferenceError::Unavailable { .. }));
    }
}
