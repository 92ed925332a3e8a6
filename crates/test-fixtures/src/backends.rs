//! Scripted inference backends for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use arbiter_core::errors::InferenceError;
use arbiter_core::models::Classification;
use arbiter_core::traits::IInferenceBackend;

pub fn entails(confidence: f64) -> Classification {
    Classification {
        entailment: 0.95,
        contradiction: 0.02,
        neutral: 0.03,
        confidence,
    }
}

pub fn contradicts(strength: f64, confidence: f64) -> Classification {
    Classification {
        entailment: 0.05,
        contradiction: strength,
        neutral: 0.05,
        confidence,
    }
}

pub fn neutral(confidence: f64) -> Classification {
    Classification {
        entailment: 0.3,
        contradiction: 0.2,
        neutral: 0.5,
        confidence,
    }
}

/// Deterministic backend: identical texts entail fully, scripted pairs return
/// their scripted value, everything else is neutral.
pub struct ScriptedBackend {
    scripted: HashMap<(String, String), Classification>,
    fallback: Classification,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            scripted: HashMap::new(),
            fallback: neutral(0.9),
            calls: AtomicUsize::new(0),
        }
    }

    /// Script a response for the pair in either order.
    pub fn with_pair(mut self, a: &str, b: &str, classification: Classification) -> Self {
        self.scripted
            .insert((a.to_string(), b.to_string()), classification);
        self.scripted
            .insert((b.to_string(), a.to_string()), classification);
        self
    }

    pub fn with_fallback(mut self, classification: Classification) -> Self {
        self.fallback = classification;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl IInferenceBackend for ScriptedBackend {
    async fn classify(
        &self,
        premise: &str,
        hypothesis: &str,
    ) -> Result<Classification, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if premise == hypothesis {
            return Ok(Classification {
                entailment: 1.0,
                contradiction: 0.0,
                neutral: 0.0,
                confidence: 0.99,
            });
        }
        Ok(self
            .scripted
            .get(&(premise.to_string(), hypothesis.to_string()))
            .copied()
            .unwrap_or(self.fallback))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Backend that is always down.
#[derive(Default)]
pub struct FailingBackend {
    calls: AtomicUsize,
}

impl FailingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IInferenceBackend for FailingBackend {
    async fn classify(
        &self,
        _premise: &str,
        _hypothesis: &str,
    ) -> Result<Classification, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(InferenceError::Unavailable {
            backend: "failing".to_string(),
            reason: "connection refused".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Backend that answers after a fixed delay.
pub struct SlowBackend {
    delay: Duration,
    response: Classification,
}

impl SlowBackend {
    pub fn new(delay: Duration, response: Classification) -> Self {
        Self { delay, response }
    }
}

impl IInferenceBackend for SlowBackend {
    async fn classify(
        &self,
        _premise: &str,
        _hypothesis: &str,
    ) -> Result<Classification, InferenceError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response)
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Backend that returns a fixed, possibly out-of-range, classification.
pub struct FixedBackend {
    response: Classification,
}

impl FixedBackend {
    pub fn new(response: Classification) -> Self {
        Self { response }
    }
}

impl IInferenceBackend for FixedBackend {
    async fn classify(
        &self,
        _premise: &str,
        _hypothesis: &str,
    ) -> Result<Classification, InferenceError> {
        Ok(self.response)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
