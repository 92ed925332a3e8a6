//! SQLite ledger store. One table, one row per entry, WAL journal.

use std::path::Path;

use arbiter_core::errors::LedgerError;
use arbiter_core::models::{LedgerEntry, LedgerEntryType};
use arbiter_core::traits::ILedgerStore;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::to_store_err;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS ledger_entries (
        sequence      INTEGER PRIMARY KEY,
        entry_type    TEXT NOT NULL,
        payload       TEXT NOT NULL,
        payload_hash  TEXT NOT NULL,
        timestamp     TEXT NOT NULL,
        previous_hash TEXT NOT NULL
    );
";

const SELECT_COLUMNS: &str =
    "SELECT sequence, entry_type, payload, payload_hash, timestamp, previous_hash
     FROM ledger_entries";

pub struct SqliteLedgerStore {
    conn: Connection,
}

impl SqliteLedgerStore {
    /// Open (or create) the ledger database at `path`.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let conn = Connection::open(path).map_err(to_store_err)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory().map_err(to_store_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, LedgerError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            PRAGMA busy_timeout = 5000;
            ",
        )
        .map_err(to_store_err)?;
        conn.execute_batch(SCHEMA).map_err(to_store_err)?;
        Ok(Self { conn })
    }

    /// Whether the connection runs in WAL mode (in-memory databases cannot).
    pub fn is_wal(&self) -> Result<bool, LedgerError> {
        let mode: String = self
            .conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .map_err(to_store_err)?;
        Ok(mode.eq_ignore_ascii_case("wal"))
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut stmt = self.conn.prepare(sql).map_err(to_store_err)?;
        let rows = stmt
            .query_map(params, row_to_raw)
            .map_err(to_store_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_store_err)?;
        rows.into_iter().map(RawEntry::into_entry).collect()
    }
}

/// Columns as stored, before parsing.
struct RawEntry {
    sequence: i64,
    entry_type: String,
    payload: String,
    payload_hash: String,
    timestamp: String,
    previous_hash: String,
}

fn row_to_raw(row: &Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        sequence: row.get(0)?,
        entry_type: row.get(1)?,
        payload: row.get(2)?,
        payload_hash: row.get(3)?,
        timestamp: row.get(4)?,
        previous_hash: row.get(5)?,
    })
}

impl RawEntry {
    fn into_entry(self) -> Result<LedgerEntry, LedgerError> {
        let corrupt = |details: String| LedgerError::CorruptChain {
            sequence: self.sequence.max(0) as u64,
            details,
        };
        let entry_type = LedgerEntryType::parse(&self.entry_type)
            .ok_or_else(|| corrupt(format!("unknown entry type '{}'", self.entry_type)))?;
        let payload = serde_json::from_str(&self.payload)
            .map_err(|e| corrupt(format!("payload is not JSON: {e}")))?;
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| corrupt(format!("bad timestamp '{}': {e}", self.timestamp)))?
            .with_timezone(&Utc);
        Ok(LedgerEntry {
            sequence: self.sequence as u64,
            entry_type,
            payload,
            payload_hash: self.payload_hash,
            timestamp,
            previous_hash: self.previous_hash,
        })
    }
}

impl ILedgerStore for SqliteLedgerStore {
    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let payload = serde_json::to_string(&entry.payload).map_err(|e| {
            LedgerError::SerializationFailed {
                reason: e.to_string(),
            }
        })?;
        self.conn
            .execute(
                "INSERT INTO ledger_entries
                     (sequence, entry_type, payload, payload_hash, timestamp, previous_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.sequence as i64,
                    entry.entry_type.name(),
                    payload,
                    entry.payload_hash,
                    entry.timestamp_key(),
                    entry.previous_hash,
                ],
            )
            .map_err(to_store_err)?;
        Ok(())
    }

    fn read_range(&self, from_sequence: u64, limit: usize) -> Result<Vec<LedgerEntry>, LedgerError> {
        self.query(
            &format!("{SELECT_COLUMNS} WHERE sequence >= ?1 ORDER BY sequence LIMIT ?2"),
            params![from_sequence as i64, limit.min(i64::MAX as usize) as i64],
        )
    }

    fn read_all(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        self.query(&format!("{SELECT_COLUMNS} ORDER BY sequence"), [])
    }

    fn last(&self) -> Result<Option<LedgerEntry>, LedgerError> {
        let raw = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} ORDER BY sequence DESC LIMIT 1"),
                [],
                row_to_raw,
            )
            .optional()
            .map_err(to_store_err)?;
        raw.map(RawEntry::into_entry).transpose()
    }

    fn len(&self) -> Result<u64, LedgerError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ledger_entries", [], |row| row.get(0))
            .map_err(to_store_err)?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::constants::GENESIS_HASH;

    fn entry(sequence: u64) -> LedgerEntry {
        let payload = serde_json::json!({ "overall_score": 0.125, "decision": "AUTO_APPROVE" });
        LedgerEntry {
            sequence,
            entry_type: LedgerEntryType::Decision,
            payload_hash: LedgerEntry::compute_payload_hash(&payload).unwrap(),
            payload,
            timestamp: Utc::now(),
            previous_hash: GENESIS_HASH.to_string(),
        }
    }

    #[test]
    fn entries_round_trip_with_identical_hashes() {
        let mut store = SqliteLedgerStore::open_in_memory().unwrap();
        let original = entry(0);
        store.append(&original).unwrap();

        let read = store.last().unwrap().unwrap();
        assert_eq!(read, original);
        assert_eq!(read.entry_hash(), original.entry_hash());
        assert!(read.payload_intact());
    }

    #[test]
    fn duplicate_sequence_is_rejected() {
        let mut store = SqliteLedgerStore::open_in_memory().unwrap();
        store.append(&entry(0)).unwrap();
        let err = store.append(&entry(0)).unwrap_err();
        assert!(matches!(err, LedgerError::StoreError { .. }));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn read_range_is_ordered_and_limited() {
        let mut store = SqliteLedgerStore::open_in_memory().unwrap();
        for s in 0..5 {
            store.append(&entry(s)).unwrap();
        }
        let range = store.read_range(1, 3).unwrap();
        let seqs: Vec<u64> = range.iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }
}
