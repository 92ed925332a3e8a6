mod arbiter_error;
mod config_error;
mod escalation_error;
mod inference_error;
mod ledger_error;

pub use arbiter_error::{ArbiterError, ArbiterResult};
pub use config_error::ConfigError;
pub use escalation_error::EscalationError;
pub use inference_error::InferenceError;
pub use ledger_error::LedgerError;
