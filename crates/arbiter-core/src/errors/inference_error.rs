/// Inference backend failures. Every variant means "no usable classification";
/// the adapter never substitutes a default value.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InferenceError {
    #[error("backend {backend} unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    #[error("backend {backend} timed out after {timeout_ms}ms")]
    Timeout { backend: String, timeout_ms: u64 },

    #[error("backend {backend} returned a malformed response: {reason}")]
    MalformedResponse { backend: String, reason: String },
}

impl InferenceError {
    /// Name of the backend that failed.
    pub fn backend(&self) -> &str {
        match self {
            InferenceError::Unavailable { backend, .. }
            | InferenceError::Timeout { backend, .. }
            | InferenceError::MalformedResponse { backend, .. } => backend,
        }
    }
}
