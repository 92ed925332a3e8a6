//! Dimension analyzers.
//!
//! `pairwise` is async and calls the inference adapter. The other four are
//! synchronous, deterministic, and dispatched through [`analyze_lexical`].

pub mod factual;
pub mod pairwise;
pub mod procedure;
pub mod safety;
pub mod semantic;

use arbiter_core::models::{Dimension, DimensionResult, SourceResponse};

/// Dimensions computed from the texts alone.
pub const LEXICAL_DIMENSIONS: [Dimension; 4] = [
    Dimension::Semantic,
    Dimension::Factual,
    Dimension::Procedure,
    Dimension::Safety,
];

/// Run one lexical analyzer. Returns `None` for `Dimension::Pairwise`, which
/// needs a backend and goes through [`pairwise::analyze`].
pub fn analyze_lexical(dimension: Dimension, sources: &[SourceResponse]) -> Option<DimensionResult> {
    match dimension {
        Dimension::Pairwise => None,
        Dimension::Semantic => Some(semantic::analyze(sources)),
        Dimension::Factual => Some(factual::analyze(sources)),
        Dimension::Procedure => Some(procedure::analyze(sources)),
        Dimension::Safety => Some(safety::analyze(sources)),
    }
}

/// Every unordered index pair `(i, j)` with `i < j`, in lexicographic order.
pub fn source_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect()
}

/// `min(1, weight * conflicts)`.
pub(crate) fn saturating_score(weight: f64, conflicts: usize) -> f64 {
    (weight * conflicts as f64).min(1.0)
}
