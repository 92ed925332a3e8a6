use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DegradationEvent, Dimension, DimensionResult, Severity};

/// Terminal outcome of one arbitration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    AutoApprove,
    EscalateHitl,
    Block,
}

impl Decision {
    /// Whether this decision needs a review ticket.
    pub fn requires_escalation(self) -> bool {
        !matches!(self, Decision::AutoApprove)
    }

    pub fn name(self) -> &'static str {
        match self {
            Decision::AutoApprove => "AUTO_APPROVE",
            Decision::EscalateHitl => "ESCALATE_HITL",
            Decision::Block => "BLOCK",
        }
    }
}

/// Why the gate reached its decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GateReason {
    CriticalFinding { dimension: Dimension },
    LowConfidence { confidence: f64, floor: f64 },
    ScoreAboveThreshold { score: f64, threshold: f64 },
    InsufficientSources { count: usize },
    WithinTolerance,
}

impl GateReason {
    pub fn describe(&self) -> String {
        match self {
            GateReason::CriticalFinding { dimension } => {
                format!("critical finding in the {dimension} dimension")
            }
            GateReason::LowConfidence { confidence, floor } => {
                format!("aggregate confidence {confidence:.2} below floor {floor:.2}")
            }
            GateReason::ScoreAboveThreshold { score, threshold } => {
                format!("overall score {score:.3} above threshold {threshold:.2}")
            }
            GateReason::InsufficientSources { count } => {
                format!("{count} source(s); nothing to compare")
            }
            GateReason::WithinTolerance => "all dimensions within tolerance".to_string(),
        }
    }
}

/// The single source of truth for a request's outcome. Never edited; a
/// correction is a new report that names the old one in `supersedes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionReport {
    pub id: String,
    pub overall_score: f64,
    pub per_dimension: Vec<DimensionResult>,
    pub aggregate_confidence: f64,
    pub decision: Decision,
    pub max_severity: Severity,
    pub reasons: Vec<GateReason>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degradations: Vec<DegradationEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<String>,
    pub source_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ContradictionReport {
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionResult> {
        self.per_dimension.iter().find(|r| r.dimension == dimension)
    }

    /// Every contradiction from every dimension, labelled by dimension.
    pub fn conflicting_options(&self) -> Vec<String> {
        self.per_dimension
            .iter()
            .flat_map(|r| {
                r.contradictions
                    .iter()
                    .map(move |c| format!("[{}] {c}", r.dimension))
            })
            .collect()
    }
}
