/// Evidence ledger errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger write failed after {attempts} attempts: {reason}")]
    WriteFailure { attempts: u32, reason: String },

    #[error("ledger halted after write failure at sequence {sequence}; refusing new appends")]
    Halted { sequence: u64 },

    #[error("ledger store error: {message}")]
    StoreError { message: String },

    #[error("ledger payload could not be serialized: {reason}")]
    SerializationFailed { reason: String },

    #[error("ledger chain corrupted at sequence {sequence}: {details}")]
    CorruptChain { sequence: u64, details: String },
}
