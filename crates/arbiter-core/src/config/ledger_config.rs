use serde::{Deserialize, Serialize};

use super::defaults;

/// Evidence ledger write policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Attempts per append before the ledger halts. Default: 3.
    pub max_write_attempts: u32,
    /// Base delay for exponential backoff between attempts. Default: 50.
    pub backoff_base_ms: u64,
    /// SQLite file for the durable store; `None` keeps the ledger in memory.
    pub db_path: Option<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_write_attempts: defaults::DEFAULT_LEDGER_MAX_WRITE_ATTEMPTS,
            backoff_base_ms: defaults::DEFAULT_LEDGER_BACKOFF_BASE_MS,
            db_path: None,
        }
    }
}
