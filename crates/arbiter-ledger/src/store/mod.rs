//! Ledger stores. A store only persists entries; hashing and ordering belong
//! to [`EvidenceLedger`](crate::EvidenceLedger).

mod memory;
mod sqlite;

pub use memory::InMemoryLedgerStore;
pub use sqlite::SqliteLedgerStore;

use arbiter_core::errors::LedgerError;

pub(crate) fn to_store_err(message: impl std::fmt::Display) -> LedgerError {
    LedgerError::StoreError {
        message: message.to_string(),
    }
}
