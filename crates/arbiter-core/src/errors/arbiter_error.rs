use super::{ConfigError, EscalationError, InferenceError, LedgerError};

/// Top-level error for the arbitration engine.
///
/// Source disagreement is never an error; it is the product. Callers see an
/// `Err` only for configuration, ledger durability, or malformed input.
#[derive(Debug, thiserror::Error)]
pub enum ArbiterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("escalation error: {0}")]
    Escalation(#[from] EscalationError),

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("arbitration task failed: {reason}")]
    TaskFailed { reason: String },
}

impl ArbiterError {
    /// Whether this error means the engine has stopped accepting requests.
    pub fn is_fail_closed(&self) -> bool {
        matches!(
            self,
            ArbiterError::Ledger(LedgerError::WriteFailure { .. } | LedgerError::Halted { .. })
        )
    }
}

pub type ArbiterResult<T> = Result<T, ArbiterError>;
