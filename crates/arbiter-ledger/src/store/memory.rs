use std::sync::{Arc, Mutex, MutexGuard};

use arbiter_core::errors::LedgerError;
use arbiter_core::models::LedgerEntry;
use arbiter_core::traits::ILedgerStore;

use super::to_store_err;

/// Volatile store. Clones share the same entries, which lets an audit
/// harness inspect (or tamper with) what the ledger wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    entries: Arc<Mutex<Vec<LedgerEntry>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<LedgerEntry>>, LedgerError> {
        self.entries
            .lock()
            .map_err(|e| to_store_err(format!("in-memory ledger lock poisoned: {e}")))
    }

    /// Apply `edit` to the stored entry at `sequence`. Returns false if there
    /// is no such entry. Stored entries are otherwise never touched.
    pub fn tamper(&self, sequence: u64, edit: impl FnOnce(&mut LedgerEntry)) -> bool {
        let Ok(mut entries) = self.lock() else {
            return false;
        };
        match entries.iter_mut().find(|e| e.sequence == sequence) {
            Some(entry) => {
                edit(entry);
                true
            }
            None => false,
        }
    }
}

impl ILedgerStore for InMemoryLedgerStore {
    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        self.lock()?.push(entry.clone());
        Ok(())
    }

    fn read_range(&self, from_sequence: u64, limit: usize) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|e| e.sequence >= from_sequence)
            .take(limit)
            .cloned()
            .collect())
    }

    fn read_all(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.lock()?.clone())
    }

    fn last(&self) -> Result<Option<LedgerEntry>, LedgerError> {
        Ok(self.lock()?.last().cloned())
    }

    fn len(&self) -> Result<u64, LedgerError> {
        Ok(self.lock()?.len() as u64)
    }
}
