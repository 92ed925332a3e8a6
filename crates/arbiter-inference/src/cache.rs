//! In-memory classification cache using moka.
//!
//! Keys are blake3 hashes of the ordered (premise, hypothesis) pair. Only
//! validated classifications are ever inserted.

use std::time::Duration;

use arbiter_core::models::Classification;
use moka::sync::Cache;

pub struct ClassificationCache {
    cache: Cache<String, Classification>,
}

impl ClassificationCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600)) // 1 hour idle TTL
            .build();
        Self { cache }
    }

    /// Cache key for an ordered pair. Order matters: NLI is directional.
    pub fn key(premise: &str, hypothesis: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(premise.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(hypothesis.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Classification> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, classification: Classification) {
        self.cache.insert(key, classification);
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cls(c: f64) -> Classification {
        Classification {
            entailment: 0.0,
            contradiction: c,
            neutral: 0.0,
            confidence: 1.0,
        }
    }

    #[test]
    fn key_is_directional() {
        assert_ne!(
            ClassificationCache::key("a", "b"),
            ClassificationCache::key("b", "a")
        );
    }

    #[test]
    fn key_separates_boundary() {
        assert_ne!(
            ClassificationCache::key("ab", "c"),
            ClassificationCache::key("a", "bc")
        );
    }

    #[test]
    fn insert_and_get() {
        let cache = ClassificationCache::new(16);
        let key = ClassificationCache::key("x", "y");
        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), cls(0.9));
        assert_eq!(cache.get(&key).unwrap().contradiction, 0.9);
    }
}
