use std::future::Future;

use crate::errors::InferenceError;
use crate::models::Classification;

/// An external semantic-inference service that classifies a pair of statements.
///
/// Implementations must return `Err` on timeout, transport failure, or a
/// malformed response. They never substitute a default classification.
pub trait IInferenceBackend: Send + Sync + 'static {
    /// Classify `hypothesis` against `premise`.
    fn classify(
        &self,
        premise: &str,
        hypothesis: &str,
    ) -> impl Future<Output = Result<Classification, InferenceError>> + Send;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
