use crate::errors::LedgerError;
use crate::models::LedgerEntry;

/// Durable append/read contract for the evidence ledger.
///
/// The ledger owns hashing and ordering; a store only persists entries.
/// `append` must be atomic: either the whole entry is stored or nothing is.
pub trait ILedgerStore: Send {
    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError>;

    /// Up to `limit` entries starting at `from_sequence`, in sequence order.
    fn read_range(
        &self,
        from_sequence: u64,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Every entry in sequence order.
    fn read_all(&self) -> Result<Vec<LedgerEntry>, LedgerError>;

    fn last(&self) -> Result<Option<LedgerEntry>, LedgerError>;

    fn len(&self) -> Result<u64, LedgerError>;

    fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }
}
