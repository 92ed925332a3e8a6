//! DecisionGate: deterministic routing of an aggregate to a decision.

use arbiter_core::config::GateConfig;
use arbiter_core::models::{Decision, Dimension, DimensionResults, GateReason};

use crate::aggregator::Aggregate;

/// Decision plus every rule that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub decision: Decision,
    pub reasons: Vec<GateReason>,
}

impl GateOutcome {
    /// Whether any dimension held a critical finding.
    pub fn has_critical_finding(&self) -> bool {
        self.reasons
            .iter()
            .any(|r| matches!(r, GateReason::CriticalFinding { .. }))
    }
}

/// Rules, strongest first:
///
/// 1. any critical finding: BLOCK
/// 2. aggregate confidence below the floor: ESCALATE_HITL
/// 3. overall score above the threshold: ESCALATE_HITL
/// 4. otherwise AUTO_APPROVE
#[derive(Debug, Clone)]
pub struct DecisionGate {
    config: GateConfig,
}

impl DecisionGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Dimensions holding a critical finding: a saturated safety score, or
    /// any dimension whose severity is critical.
    ///
    /// A degraded safety substitute only counts once a finding has been
    /// folded into it; its carried-over score alone is not evidence.
    pub fn critical_dimensions(&self, results: &DimensionResults) -> Vec<Dimension> {
        results
            .iter()
            .filter(|r| {
                r.severity.is_critical()
                    || (r.dimension == Dimension::Safety
                        && (!r.degraded || !r.contradictions.is_empty())
                        && r.score >= self.config.safety_saturation)
            })
            .map(|r| r.dimension)
            .collect()
    }

    pub fn decide(
        &self,
        results: &DimensionResults,
        aggregate: &Aggregate,
        source_count: usize,
    ) -> GateOutcome {
        if source_count < 2 {
            return GateOutcome {
                decision: Decision::AutoApprove,
                reasons: vec![GateReason::InsufficientSources {
                    count: source_count,
                }],
            };
        }

        let mut reasons: Vec<GateReason> = self
            .critical_dimensions(results)
            .into_iter()
            .map(|dimension| GateReason::CriticalFinding { dimension })
            .collect();
        let critical = !reasons.is_empty();

        if aggregate.aggregate_confidence < self.config.confidence_floor {
            reasons.push(GateReason::LowConfidence {
                confidence: aggregate.aggregate_confidence,
                floor: self.config.confidence_floor,
            });
        }
        if aggregate.overall_score > self.config.score_threshold {
            reasons.push(GateReason::ScoreAboveThreshold {
                score: aggregate.overall_score,
                threshold: self.config.score_threshold,
            });
        }

        let decision = if critical {
            Decision::Block
        } else if reasons.is_empty() {
            reasons.push(GateReason::WithinTolerance);
            Decision::AutoApprove
        } else {
            Decision::EscalateHitl
        };

        GateOutcome { decision, reasons }
    }
}
