//! Weighted aggregation over the five dimension results.

use arbiter_core::config::DimensionWeights;
use arbiter_core::models::{clamp_unit, DimensionResults};
use serde::Serialize;

/// Joined view of all five dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    pub overall_score: f64,
    pub aggregate_confidence: f64,
}

/// `overall = Σ weight·score`, `confidence = mean(confidence)`, both in [0, 1].
///
/// Takes the complete result set; there is no partial aggregation.
pub fn aggregate(results: &DimensionResults, weights: &DimensionWeights) -> Aggregate {
    let DimensionResults {
        pairwise,
        semantic,
        factual,
        procedure,
        safety,
    } = results;

    let overall = weights.pairwise * pairwise.score
        + weights.semantic * semantic.score
        + weights.factual * factual.score
        + weights.procedure * procedure.score
        + weights.safety * safety.score;

    let confidence = (pairwise.confidence
        + semantic.confidence
        + factual.confidence
        + procedure.confidence
        + safety.confidence)
        / 5.0;

    Aggregate {
        overall_score: clamp_unit(overall),
        aggregate_confidence: clamp_unit(confidence),
    }
}

#[cfg(test)]
mod tests {
    use arbiter_core::models::{Dimension, DimensionResult};

    use super::*;

    fn results(scores: [f64; 5], confidences: [f64; 5]) -> DimensionResults {
        let mut r = DimensionResults::vacuous();
        for (i, d) in Dimension::ALL.into_iter().enumerate() {
            *r.get_mut(d) = DimensionResult::new(d, scores[i], confidences[i]);
        }
        r
    }

    #[test]
    fn vacuous_results_aggregate_to_zero() {
        let a = aggregate(&DimensionResults::vacuous(), &DimensionWeights::default());
        assert_eq!(a.overall_score, 0.0);
        assert_eq!(a.aggregate_confidence, 1.0);
    }

    #[test]
    fn default_weights_apply_per_label() {
        // Order of ALL: pairwise, semantic, factual, procedure, safety.
        let a = aggregate(
            &results([1.0, 0.0, 0.8, 0.0, 0.0], [0.9, 1.0, 1.0, 1.0, 1.0]),
            &DimensionWeights::default(),
        );
        assert!((a.overall_score - (0.05 + 0.25 * 0.8)).abs() < 1e-12);
        assert!((a.aggregate_confidence - 0.98).abs() < 1e-12);
    }

    #[test]
    fn saturated_everything_is_one() {
        let a = aggregate(&results([1.0; 5], [1.0; 5]), &DimensionWeights::default());
        assert!((a.overall_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn one_degraded_dimension_lowers_confidence() {
        let a = aggregate(
            &results([0.0; 5], [0.3, 1.0, 1.0, 1.0, 1.0]),
            &DimensionWeights::default(),
        );
        assert!((a.aggregate_confidence - 0.86).abs() < 1e-12);
    }
}
