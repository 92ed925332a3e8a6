use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One append-only record in the evidence ledger.
///
/// `previous_hash` of entry k equals `entry_hash()` of entry k-1; the first
/// entry carries [`GENESIS_HASH`](crate::constants::GENESIS_HASH).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub sequence: u64,
    pub entry_type: LedgerEntryType,
    pub payload: serde_json::Value,
    /// blake3 of the canonical JSON payload.
    pub payload_hash: String,
    pub timestamp: DateTime<Utc>,
    pub previous_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryType {
    /// A terminal arbitration decision.
    Decision,
    /// A decision that supersedes an earlier report.
    Correction,
}

impl LedgerEntryType {
    pub fn name(self) -> &'static str {
        match self {
            LedgerEntryType::Decision => "decision",
            LedgerEntryType::Correction => "correction",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "decision" => Some(LedgerEntryType::Decision),
            "correction" => Some(LedgerEntryType::Correction),
            _ => None,
        }
    }
}

impl LedgerEntry {
    /// blake3 hash of the payload's JSON serialization.
    pub fn compute_payload_hash(payload: &serde_json::Value) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(payload)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    /// Timestamp in the fixed textual form that enters the entry hash.
    pub fn timestamp_key(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    /// Hash of this entry's header. Covers the payload through `payload_hash`.
    pub fn entry_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.sequence.to_le_bytes());
        hasher.update(self.entry_type.name().as_bytes());
        hasher.update(&[0]);
        hasher.update(self.payload_hash.as_bytes());
        hasher.update(&[0]);
        hasher.update(self.timestamp_key().as_bytes());
        hasher.update(&[0]);
        hasher.update(self.previous_hash.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    /// Whether the stored payload still matches its recorded hash.
    pub fn payload_intact(&self) -> bool {
        Self::compute_payload_hash(&self.payload)
            .map(|h| h == self.payload_hash)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GENESIS_HASH;

    fn entry(payload: serde_json::Value) -> LedgerEntry {
        LedgerEntry {
            sequence: 0,
            entry_type: LedgerEntryType::Decision,
            payload_hash: LedgerEntry::compute_payload_hash(&payload).unwrap(),
            payload,
            timestamp: Utc::now(),
            previous_hash: GENESIS_HASH.to_string(),
        }
    }

    #[test]
    fn entry_hash_is_stable() {
        let e = entry(serde_json::json!({"decision": "BLOCK"}));
        assert_eq!(e.entry_hash(), e.entry_hash());
        assert_eq!(e.entry_hash().len(), 64);
    }

    #[test]
    fn entry_hash_changes_with_any_header_field() {
        let e = entry(serde_json::json!({"decision": "BLOCK"}));
        let base = e.entry_hash();

        let mut seq = e.clone();
        seq.sequence = 1;
        assert_ne!(seq.entry_hash(), base);

        let mut prev = e.clone();
        prev.previous_hash = "f".repeat(64);
        assert_ne!(prev.entry_hash(), base);

        let mut kind = e.clone();
        kind.entry_type = LedgerEntryType::Correction;
        assert_ne!(kind.entry_hash(), base);
    }

    #[test]
    fn payload_mutation_breaks_payload_hash() {
        let mut e = entry(serde_json::json!({"overall_score": 0.1}));
        assert!(e.payload_intact());
        e.payload = serde_json::json!({"overall_score": 0.0});
        assert!(!e.payload_intact());
    }

    #[test]
    fn entry_type_round_trips_through_name() {
        for t in [LedgerEntryType::Decision, LedgerEntryType::Correction] {
            assert_eq!(LedgerEntryType::parse(t.name()), Some(t));
        }
        assert_eq!(LedgerEntryType::parse("bogus"), None);
    }
}
