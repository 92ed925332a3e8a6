use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Last-good partial score of an analyzer that is still running.
///
/// When an analyzer times out, its substitute result carries whatever score
/// it had published here (0 if nothing). Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct ScoreProgress {
    // f64 bits; u64::MAX marks "nothing published yet".
    bits: Arc<AtomicU64>,
}

const UNSET: u64 = u64::MAX;

impl ScoreProgress {
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(UNSET)),
        }
    }

    pub fn publish(&self, score: f64) {
        self.bits.store(score.to_bits(), Ordering::Release);
    }

    pub fn last_good(&self) -> Option<f64> {
        match self.bits.load(Ordering::Acquire) {
            UNSET => None,
            bits => Some(f64::from_bits(bits)),
        }
    }

    /// Last-good score, or 0 when nothing was published.
    pub fn last_good_or_zero(&self) -> f64 {
        self.last_good().unwrap_or(0.0)
    }
}

impl Default for ScoreProgress {
    fn default() -> Self {
        Self::new()
    }
}
