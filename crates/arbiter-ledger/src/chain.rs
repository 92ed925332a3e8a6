//! Chain verification, recomputed from genesis.

use arbiter_core::constants::GENESIS_HASH;
use arbiter_core::models::LedgerEntry;
use serde::{Deserialize, Serialize};

/// Result of walking the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainVerification {
    /// Entries verified intact before the first break (all of them when the
    /// chain is whole).
    pub entries_checked: u64,
    pub first_break: Option<ChainBreak>,
}

impl ChainVerification {
    pub fn is_intact(&self) -> bool {
        self.first_break.is_none()
    }
}

/// The first entry that fails verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainBreak {
    pub sequence: u64,
    pub kind: ChainBreakKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChainBreakKind {
    /// The entry at this position carries the wrong sequence number.
    SequenceGap { expected: u64 },
    /// The payload no longer hashes to `payload_hash`.
    PayloadHashMismatch,
    /// `previous_hash` does not match the recomputed hash of the prior entry.
    PreviousHashMismatch { expected: String, found: String },
}

impl std::fmt::Display for ChainBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ChainBreakKind::SequenceGap { expected } => {
                write!(f, "sequence {} found where {} was expected", self.sequence, expected)
            }
            ChainBreakKind::PayloadHashMismatch => {
                write!(f, "payload of entry {} does not match its hash", self.sequence)
            }
            ChainBreakKind::PreviousHashMismatch { expected, found } => write!(
                f,
                "entry {} links to {} but the prior entry hashes to {}",
                self.sequence, found, expected
            ),
        }
    }
}

/// Verify `entries` (in storage order) from genesis and report the first
/// broken link.
pub fn verify_entries(entries: &[LedgerEntry]) -> ChainVerification {
    let mut expected_previous = GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        let position = position as u64;
        let broken = if entry.sequence != position {
            Some(ChainBreakKind::SequenceGap { expected: position })
        } else if !entry.payload_intact() {
            Some(ChainBreakKind::PayloadHashMismatch)
        } else if entry.previous_hash != expected_previous {
            Some(ChainBreakKind::PreviousHashMismatch {
                expected: expected_previous,
                found: entry.previous_hash.clone(),
            })
        } else {
            None
        };

        if let Some(kind) = broken {
            return ChainVerification {
                entries_checked: position,
                first_break: Some(ChainBreak {
                    sequence: entry.sequence,
                    kind,
                }),
            };
        }
        expected_previous = entry.entry_hash();
    }

    ChainVerification {
        entries_checked: entries.len() as u64,
        first_break: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::models::LedgerEntryType;
    use chrono::Utc;

    fn chain(n: u64) -> Vec<LedgerEntry> {
        let mut previous = GENESIS_HASH.to_string();
        (0..n)
            .map(|sequence| {
                let payload = serde_json::json!({ "n": sequence });
                let entry = LedgerEntry {
                    sequence,
                    entry_type: LedgerEntryType::Decision,
                    payload_hash: LedgerEntry::compute_payload_hash(&payload).unwrap(),
                    payload,
                    timestamp: Utc::now(),
                    previous_hash: previous.clone(),
                };
                previous = entry.entry_hash();
                entry
            })
            .collect()
    }

    #[test]
    fn empty_chain_is_intact() {
        let v = verify_entries(&[]);
        assert!(v.is_intact());
        assert_eq!(v.entries_checked, 0);
    }

    #[test]
    fn whole_chain_is_intact() {
        let v = verify_entries(&chain(5));
        assert!(v.is_intact());
        assert_eq!(v.entries_checked, 5);
    }

    #[test]
    fn missing_entry_is_a_sequence_gap() {
        let mut entries = chain(4);
        entries.remove(2);
        let v = verify_entries(&entries);
        let b = v.first_break.unwrap();
        assert_eq!(b.sequence, 3);
        assert_eq!(b.kind, ChainBreakKind::SequenceGap { expected: 2 });
        assert_eq!(v.entries_checked, 2);
    }

    #[test]
    fn rehashed_payload_breaks_the_next_link() {
        let mut entries = chain(3);
        entries[1].payload = serde_json::json!({ "n": 99 });
        entries[1].payload_hash = LedgerEntry::compute_payload_hash(&entries[1].payload).unwrap();
        let b = verify_entries(&entries).first_break.unwrap();
        assert_eq!(b.sequence, 2);
        assert!(matches!(b.kind, ChainBreakKind::PreviousHashMismatch { .. }));
        assert!(b.to_string().contains("entry 2 links to"));
    }
}
