//! EvidenceLedger: the single writer over a ledger store.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arbiter_core::config::LedgerConfig;
use arbiter_core::constants::GENESIS_HASH;
use arbiter_core::errors::LedgerError;
use arbiter_core::models::{ContradictionReport, LedgerEntry, LedgerEntryType};
use arbiter_core::traits::ILedgerStore;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::chain::{verify_entries, ChainVerification};
use crate::store::{InMemoryLedgerStore, SqliteLedgerStore};

struct LedgerState {
    store: Box<dyn ILedgerStore>,
    next_sequence: u64,
    head_hash: String,
    /// Sequence whose write exhausted its retries.
    halted_at: Option<u64>,
}

/// Append-only, hash-chained decision log.
///
/// All appends are serialized through one async mutex. Entries are never
/// updated or deleted.
pub struct EvidenceLedger {
    state: Mutex<LedgerState>,
    halted: AtomicBool,
    max_write_attempts: u32,
    backoff_base: Duration,
}

impl EvidenceLedger {
    /// Open a ledger over `store`, resuming after its last entry.
    pub fn open(store: impl ILedgerStore + 'static, config: &LedgerConfig) -> Result<Self, LedgerError> {
        let last = store.last()?;
        let (next_sequence, head_hash) = match &last {
            Some(entry) => (entry.sequence + 1, entry.entry_hash()),
            None => (0, GENESIS_HASH.to_string()),
        };
        info!(next_sequence, "evidence ledger opened");

        Ok(Self {
            state: Mutex::new(LedgerState {
                store: Box::new(store),
                next_sequence,
                head_hash,
                halted_at: None,
            }),
            halted: AtomicBool::new(false),
            max_write_attempts: config.max_write_attempts.max(1),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        })
    }

    /// SQLite at `config.db_path`, or an in-memory store when unset.
    pub fn from_config(config: &LedgerConfig) -> Result<Self, LedgerError> {
        match &config.db_path {
            Some(path) => Self::open(SqliteLedgerStore::open(Path::new(path))?, config),
            None => Self::open(InMemoryLedgerStore::new(), config),
        }
    }

    /// Append one entry.
    ///
    /// A failed store write is retried with exponential backoff up to
    /// `max_write_attempts` times. When every attempt fails the ledger halts
    /// and every later append returns [`LedgerError::Halted`].
    pub async fn append(
        &self,
        entry_type: LedgerEntryType,
        payload: serde_json::Value,
    ) -> Result<LedgerEntry, LedgerError> {
        let mut state = self.state.lock().await;
        if let Some(sequence) = state.halted_at {
            return Err(LedgerError::Halted { sequence });
        }

        let payload_hash = LedgerEntry::compute_payload_hash(&payload).map_err(|e| {
            LedgerError::SerializationFailed {
                reason: e.to_string(),
            }
        })?;
        let entry = LedgerEntry {
            sequence: state.next_sequence,
            entry_type,
            payload,
            payload_hash,
            timestamp: Utc::now(),
            previous_hash: state.head_hash.clone(),
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match state.store.append(&entry) {
                Ok(()) => break,
                Err(e) if attempt < self.max_write_attempts => {
                    let delay = self.backoff_base * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        sequence = entry.sequence,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "ledger write failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    state.halted_at = Some(entry.sequence);
                    self.halted.store(true, Ordering::SeqCst);
                    error!(
                        sequence = entry.sequence,
                        attempts = attempt,
                        error = %e,
                        "ledger write failed on every attempt; ledger halted"
                    );
                    return Err(LedgerError::WriteFailure {
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }
            }
        }

        state.head_hash = entry.entry_hash();
        state.next_sequence += 1;
        debug!(sequence = entry.sequence, entry_type = entry.entry_type.name(), "ledger entry appended");
        Ok(entry)
    }

    /// Record a report. A report that supersedes another is a correction.
    pub async fn append_report(&self, report: &ContradictionReport) -> Result<LedgerEntry, LedgerError> {
        let payload = serde_json::to_value(report).map_err(|e| LedgerError::SerializationFailed {
            reason: e.to_string(),
        })?;
        let entry_type = if report.supersedes.is_some() {
            LedgerEntryType::Correction
        } else {
            LedgerEntryType::Decision
        };
        self.append(entry_type, payload).await
    }

    /// Every entry in sequence order.
    pub async fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        self.state.lock().await.store.read_all()
    }

    pub async fn read_range(&self, from_sequence: u64, limit: usize) -> Result<Vec<LedgerEntry>, LedgerError> {
        self.state.lock().await.store.read_range(from_sequence, limit)
    }

    /// Recompute the chain from genesis.
    pub async fn verify_chain(&self) -> Result<ChainVerification, LedgerError> {
        let entries = self.entries().await?;
        let verification = verify_entries(&entries);
        if let Some(broken) = &verification.first_break {
            warn!(sequence = broken.sequence, details = %broken, "ledger chain broken");
        }
        Ok(verification)
    }

    /// Number of entries written.
    pub async fn len(&self) -> u64 {
        self.state.lock().await.next_sequence
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Hash the next entry will link to.
    pub async fn head_hash(&self) -> String {
        self.state.lock().await.head_hash.clone()
    }

    /// Whether a write has failed for good. Never waits on the writer.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for EvidenceLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceLedger")
            .field("halted", &self.is_halted())
            .field("max_write_attempts", &self.max_write_attempts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> EvidenceLedger {
        EvidenceLedger::open(InMemoryLedgerStore::new(), &LedgerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn first_entry_links_to_genesis() {
        let ledger = ledger();
        let e = ledger
            .append(LedgerEntryType::Decision, serde_json::json!({"decision": "BLOCK"}))
            .await
            .unwrap();
        assert_eq!(e.sequence, 0);
        assert_eq!(e.previous_hash, GENESIS_HASH);
        assert_eq!(ledger.head_hash().await, e.entry_hash());
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn reopening_resumes_the_chain() {
        let store = InMemoryLedgerStore::new();
        let first = EvidenceLedger::open(store.clone(), &LedgerConfig::default()).unwrap();
        let a = first
            .append(LedgerEntryType::Decision, serde_json::json!({"n": 0}))
            .await
            .unwrap();

        let second = EvidenceLedger::open(store, &LedgerConfig::default()).unwrap();
        let b = second
            .append(LedgerEntryType::Decision, serde_json::json!({"n": 1}))
            .await
            .unwrap();
        assert_eq!(b.sequence, 1);
        assert_eq!(b.previous_hash, a.entry_hash());
        assert!(second.verify_chain().await.unwrap().is_intact());
    }
}
