//! # arbiter-ledger
//!
//! Append-only evidence ledger. Every arbitration decision becomes one
//! [`LedgerEntry`](arbiter_core::models::LedgerEntry) whose `previous_hash`
//! links it to the entry before, so any later edit is detectable by
//! [`EvidenceLedger::verify_chain`].
//!
//! Appends go through a single async mutex. A store write that keeps failing
//! after bounded retries halts the ledger for good.

pub mod chain;
pub mod ledger;
pub mod store;

pub use chain::{verify_entries, ChainBreak, ChainBreakKind, ChainVerification};
pub use ledger::EvidenceLedger;
pub use store::{InMemoryLedgerStore, SqliteLedgerStore};
