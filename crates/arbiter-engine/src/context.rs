//! Per-request state that travels through one arbitration.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use arbiter_analysis::ScoreProgress;
use arbiter_core::models::{DegradationEvent, Dimension};
use arbiter_observability::tracing_setup::events;

/// Everything an arbitration request owns: its id, a last-good score slot
/// per analyzer, and the degradations recorded along the way. Nothing in
/// here outlives the request.
#[derive(Debug)]
pub struct ArbitrationContext {
    request_id: String,
    started: Instant,
    progress: [ScoreProgress; 5],
    degradations: Mutex<Vec<DegradationEvent>>,
}

fn slot(dimension: Dimension) -> usize {
    match dimension {
        Dimension::Pairwise => 0,
        Dimension::Semantic => 1,
        Dimension::Factual => 2,
        Dimension::Procedure => 3,
        Dimension::Safety => 4,
    }
}

impl ArbitrationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started: Instant::now(),
            progress: Default::default(),
            degradations: Mutex::new(Vec::new()),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Last-good score slot for `dimension`.
    pub fn progress(&self, dimension: Dimension) -> &ScoreProgress {
        &self.progress[slot(dimension)]
    }

    fn degradations(&self) -> MutexGuard<'_, Vec<DegradationEvent>> {
        self.degradations.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record and log a fallback.
    pub fn record_degradation(&self, event: DegradationEvent) {
        events::degradation_triggered(&event);
        self.degradations().push(event);
    }

    /// Whether a degradation was already recorded for `component`.
    pub fn has_degradation(&self, component: &str) -> bool {
        self.degradations().iter().any(|e| e.component == component)
    }

    pub fn take_degradations(&self) -> Vec<DegradationEvent> {
        std::mem::take(&mut *self.degradations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_slots_are_independent() {
        let ctx = ArbitrationContext::new("req-1");
        ctx.progress(Dimension::Pairwise).publish(0.4);
        assert_eq!(ctx.progress(Dimension::Pairwise).last_good(), Some(0.4));
        for d in &Dimension::ALL[1..] {
            assert_eq!(ctx.progress(*d).last_good(), None);
        }
    }

    #[test]
    fn degradations_drain_once() {
        let ctx = ArbitrationContext::new("req-2");
        ctx.record_degradation(DegradationEvent::now("safety", "timed out", "last-good score"));
        assert!(ctx.has_degradation("safety"));
        assert!(!ctx.has_degradation("factual"));
        assert_eq!(ctx.take_degradations().len(), 1);
        assert!(ctx.take_degradations().is_empty());
    }
}
