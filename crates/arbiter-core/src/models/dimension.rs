use serde::{Deserialize, Serialize};

use super::Severity;

/// One independent axis of comparison between sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Pairwise,
    Semantic,
    Factual,
    Procedure,
    Safety,
}

impl Dimension {
    /// All dimensions in report order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Pairwise,
        Dimension::Semantic,
        Dimension::Factual,
        Dimension::Procedure,
        Dimension::Safety,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Pairwise => "pairwise",
            Dimension::Semantic => "semantic",
            Dimension::Factual => "factual",
            Dimension::Procedure => "procedure",
            Dimension::Safety => "safety",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Clamp to [0, 1]; NaN maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Output of one analyzer run. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    pub dimension: Dimension,
    /// Disagreement in [0, 1]; 0 means full agreement.
    pub score: f64,
    pub contradictions: Vec<String>,
    /// Populated by the pairwise dimension only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entailments: Vec<String>,
    pub confidence: f64,
    /// Highest severity among this dimension's findings.
    #[serde(default)]
    pub severity: Severity,
    /// True when this result is a substitute for a failed or timed-out run.
    #[serde(default)]
    pub degraded: bool,
}

impl DimensionResult {
    /// Build a result, clamping score and confidence into [0, 1].
    pub fn new(dimension: Dimension, score: f64, confidence: f64) -> Self {
        Self {
            dimension,
            score: clamp_unit(score),
            contradictions: Vec::new(),
            entailments: Vec::new(),
            confidence: clamp_unit(confidence),
            severity: Severity::None,
            degraded: false,
        }
    }

    /// Nothing to compare: score 0, full confidence.
    pub fn vacuous(dimension: Dimension) -> Self {
        Self::new(dimension, 0.0, 1.0)
    }

    /// Substitute result for an analyzer that failed or timed out.
    pub fn degraded(dimension: Dimension, last_good_score: f64, confidence_floor: f64) -> Self {
        Self {
            degraded: true,
            ..Self::new(dimension, last_good_score, confidence_floor)
        }
    }

    pub fn with_contradictions(mut self, contradictions: Vec<String>) -> Self {
        self.contradictions = contradictions;
        self
    }

    pub fn with_entailments(mut self, entailments: Vec<String>) -> Self {
        self.entailments = entailments;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Add to the score (clamped) and record a finding.
    pub fn fold_finding(&mut self, increment: f64, description: String, severity: Severity) {
        self.score = clamp_unit(self.score + increment);
        self.contradictions.push(description);
        self.severity = self.severity.max(severity);
    }
}

/// Exactly one result per dimension, addressed by label.
///
/// The aggregator reads results only through this type, so completion order
/// of the analyzer tasks can never influence the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResults {
    pub pairwise: DimensionResult,
    pub semantic: DimensionResult,
    pub factual: DimensionResult,
    pub procedure: DimensionResult,
    pub safety: DimensionResult,
}

impl DimensionResults {
    /// All five dimensions vacuously consistent.
    pub fn vacuous() -> Self {
        Self {
            pairwise: DimensionResult::vacuous(Dimension::Pairwise),
            semantic: DimensionResult::vacuous(Dimension::Semantic),
            factual: DimensionResult::vacuous(Dimension::Factual),
            procedure: DimensionResult::vacuous(Dimension::Procedure),
            safety: DimensionResult::vacuous(Dimension::Safety),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &DimensionResult {
        match dimension {
            Dimension::Pairwise => &self.pairwise,
            Dimension::Semantic => &self.semantic,
            Dimension::Factual => &self.factual,
            Dimension::Procedure => &self.procedure,
            Dimension::Safety => &self.safety,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut DimensionResult {
        match dimension {
            Dimension::Pairwise => &mut self.pairwise,
            Dimension::Semantic => &mut self.semantic,
            Dimension::Factual => &mut self.factual,
            Dimension::Procedure => &mut self.procedure,
            Dimension::Safety => &mut self.safety,
        }
    }

    /// Results in `Dimension::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = &DimensionResult> {
        Dimension::ALL.into_iter().map(move |d| self.get(d))
    }

    pub fn max_severity(&self) -> Severity {
        self.iter().map(|r| r.severity).max().unwrap_or_default()
    }

    /// Dimensions whose result is a degraded substitute.
    pub fn degraded_dimensions(&self) -> Vec<Dimension> {
        self.iter().filter(|r| r.degraded).map(|r| r.dimension).collect()
    }

    pub fn into_vec(self) -> Vec<DimensionResult> {
        vec![
            self.pairwise,
            self.semantic,
            self.factual,
            self.procedure,
            self.safety,
        ]
    }
}

/// Collects analyzer results as they arrive, in any order.
#[derive(Debug, Default)]
pub struct PartialDimensionResults {
    pairwise: Option<DimensionResult>,
    semantic: Option<DimensionResult>,
    factual: Option<DimensionResult>,
    procedure: Option<DimensionResult>,
    safety: Option<DimensionResult>,
}

impl PartialDimensionResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result under its own label. A second result for the same
    /// dimension replaces the first.
    pub fn insert(&mut self, result: DimensionResult) {
        let slot = match result.dimension {
            Dimension::Pairwise => &mut self.pairwise,
            Dimension::Semantic => &mut self.semantic,
            Dimension::Factual => &mut self.factual,
            Dimension::Procedure => &mut self.procedure,
            Dimension::Safety => &mut self.safety,
        };
        *slot = Some(result);
    }

    /// Dimensions that have not reported yet.
    pub fn missing(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|d| {
                match d {
                    Dimension::Pairwise => &self.pairwise,
                    Dimension::Semantic => &self.semantic,
                    Dimension::Factual => &self.factual,
                    Dimension::Procedure => &self.procedure,
                    Dimension::Safety => &self.safety,
                }
                .is_none()
            })
            .collect()
    }

    /// Complete the set, filling any missing dimension from `substitute`.
    pub fn complete_with(
        self,
        mut substitute: impl FnMut(Dimension) -> DimensionResult,
    ) -> DimensionResults {
        DimensionResults {
            pairwise: self
                .pairwise
                .unwrap_or_else(|| substitute(Dimension::Pairwise)),
            semantic: self
                .semantic
                .unwrap_or_else(|| substitute(Dimension::Semantic)),
            factual: self.factual.unwrap_or_else(|| substitute(Dimension::Factual)),
            procedure: self
                .procedure
                .unwrap_or_else(|| substitute(Dimension::Procedure)),
            safety: self.safety.unwrap_or_else(|| substitute(Dimension::Safety)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_out_of_range_values() {
        let r = DimensionResult::new(Dimension::Factual, 3.2, -0.5);
        assert_eq!(r.score, 1.0);
        assert_eq!(r.confidence, 0.0);

        let nan = DimensionResult::new(Dimension::Factual, f64::NAN, f64::NAN);
        assert_eq!(nan.score, 0.0);
        assert_eq!(nan.confidence, 0.0);
    }

    #[test]
    fn fold_finding_saturates_and_raises_severity() {
        let mut r = DimensionResult::new(Dimension::Safety, 0.5, 1.0);
        r.fold_finding(0.8, "too hot".into(), Severity::High);
        assert_eq!(r.score, 1.0);
        assert_eq!(r.severity, Severity::High);
        r.fold_finding(0.1, "minor".into(), Severity::Low);
        assert_eq!(r.severity, Severity::High);
        assert_eq!(r.contradictions.len(), 2);
    }

    #[test]
    fn partial_results_fill_only_missing_dimensions() {
        let mut partial = PartialDimensionResults::new();
        partial.insert(DimensionResult::new(Dimension::Safety, 0.9, 1.0));
        partial.insert(DimensionResult::new(Dimension::Pairwise, 0.1, 0.7));
        assert_eq!(
            partial.missing(),
            vec![Dimension::Semantic, Dimension::Factual, Dimension::Procedure]
        );

        let full = partial.complete_with(|d| DimensionResult::degraded(d, 0.0, 0.3));
        assert_eq!(full.safety.score, 0.9);
        assert!(!full.safety.degraded);
        assert!(full.semantic.degraded);
        assert_eq!(
            full.degraded_dimensions(),
            vec![Dimension::Semantic, Dimension::Factual, Dimension::Procedure]
        );
    }

    #[test]
    fn iteration_follows_report_order() {
        let results = DimensionResults::vacuous();
        let order: Vec<Dimension> = results.iter().map(|r| r.dimension).collect();
        assert_eq!(order, Dimension::ALL.to_vec());
    }
}
