//! Process-wide decision counters.

use std::sync::atomic::{AtomicU64, Ordering};

use arbiter_core::models::Decision;
use serde::{Deserialize, Serialize};

/// Lock-free counters updated by the engine on every request.
#[derive(Debug, Default)]
pub struct ArbitrationMetrics {
    requests: AtomicU64,
    auto_approved: AtomicU64,
    escalated: AtomicU64,
    blocked: AtomicU64,
    degraded_dimensions: AtomicU64,
    rejected_inputs: AtomicU64,
    ledger_failures: AtomicU64,
    total_latency_ms: AtomicU64,
}

/// Serializable copy of the counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub auto_approved: u64,
    pub escalated: u64,
    pub blocked: u64,
    pub degraded_dimensions: u64,
    pub rejected_inputs: u64,
    pub ledger_failures: u64,
    pub avg_latency_ms: f64,
}

impl ArbitrationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_decision(&self, decision: Decision, degraded_dimensions: usize, latency_ms: u64) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let counter = match decision {
            Decision::AutoApprove => &self.auto_approved,
            Decision::EscalateHitl => &self.escalated,
            Decision::Block => &self.blocked,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.degraded_dimensions
            .fetch_add(degraded_dimensions as u64, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
    }

    pub fn record_rejected_input(&self) {
        self.rejected_inputs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ledger_failure(&self) {
        self.ledger_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);
        MetricsSnapshot {
            requests,
            auto_approved: self.auto_approved.load(Ordering::Relaxed),
            escalated: self.escalated.load(Ordering::Relaxed),
            blocked: self.blocked.load(Ordering::Relaxed),
            degraded_dimensions: self.degraded_dimensions.load(Ordering::Relaxed),
            rejected_inputs: self.rejected_inputs.load(Ordering::Relaxed),
            ledger_failures: self.ledger_failures.load(Ordering::Relaxed),
            avg_latency_ms: if requests == 0 {
                0.0
            } else {
                total_latency as f64 / requests as f64
            },
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.requests,
            &self.auto_approved,
            &self.escalated,
            &self.blocked,
            &self.degraded_dimensions,
            &self.rejected_inputs,
            &self.ledger_failures,
            &self.total_latency_ms,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
