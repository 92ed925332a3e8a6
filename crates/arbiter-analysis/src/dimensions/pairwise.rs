//! Pairwise entailment dimension.
//!
//! Classifies every unordered pair of sources through the inference adapter
//! on a bounded worker pool. A pair whose classification fails falls back to
//! a lexical-overlap estimate and marks the whole dimension degraded.

use std::sync::Arc;

use arbiter_core::config::AnalysisConfig;
use arbiter_core::constants::LEXICAL_FALLBACK_SCALE;
use arbiter_core::errors::InferenceError;
use arbiter_core::models::{
    Classification, Dimension, DimensionResult, PairRelation, Severity, SourceResponse,
};
use arbiter_core::traits::IInferenceBackend;
use arbiter_inference::InferenceAdapter;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::source_pairs;
use crate::progress::ScoreProgress;
use crate::text::{content_tokens, jaccard};

/// Pairwise result plus the backend failures that forced a fallback.
#[derive(Debug, Clone)]
pub struct PairwiseOutcome {
    pub result: DimensionResult,
    pub failures: Vec<InferenceError>,
}

/// Disagreement estimate used when the backend cannot classify a pair.
pub fn lexical_disagreement(a: &str, b: &str) -> f64 {
    (1.0 - jaccard(&content_tokens(a), &content_tokens(b))) * LEXICAL_FALLBACK_SCALE
}

/// Run the pairwise dimension.
///
/// Pair results are folded in pair order, so completion order never affects
/// the score. The running mean over finished pairs is published to
/// `progress` as the last-good score.
pub async fn analyze<B: IInferenceBackend>(
    adapter: Arc<InferenceAdapter<B>>,
    sources: &[SourceResponse],
    config: &AnalysisConfig,
    progress: &ScoreProgress,
) -> PairwiseOutcome {
    let pairs = source_pairs(sources.len());
    if pairs.is_empty() {
        progress.publish(0.0);
        return PairwiseOutcome {
            result: DimensionResult::vacuous(Dimension::Pairwise),
            failures: Vec::new(),
        };
    }

    let semaphore = Arc::new(Semaphore::new(config.pairwise_worker_pool_size.max(1)));
    let mut tasks = JoinSet::new();
    for (idx, &(i, j)) in pairs.iter().enumerate() {
        let adapter = Arc::clone(&adapter);
        let semaphore = Arc::clone(&semaphore);
        let premise = sources[i].text.clone();
        let hypothesis = sources[j].text.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            (idx, adapter.classify(&premise, &hypothesis).await)
        });
    }

    let mut slots: Vec<Option<Result<Classification, InferenceError>>> = vec![None; pairs.len()];
    let mut finished_sum = 0.0;
    let mut finished = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, outcome)) => {
                if let Ok(classification) = &outcome {
                    finished_sum += classification.pair_score();
                    finished += 1;
                    progress.publish(finished_sum / finished as f64);
                }
                slots[idx] = Some(outcome);
            }
            Err(e) => warn!(error = %e, "pairwise classification task failed"),
        }
    }

    let mut score_sum = 0.0;
    let mut confidence_sum = 0.0;
    let mut classified = 0usize;
    let mut contradictions = Vec::new();
    let mut entailments = Vec::new();
    let mut failures = Vec::new();

    for (slot, &(i, j)) in slots.into_iter().zip(pairs.iter()) {
        let (a, b) = (&sources[i], &sources[j]);
        match slot {
            Some(Ok(c)) => {
                score_sum += c.pair_score();
                confidence_sum += c.confidence;
                classified += 1;
                match c.relation() {
                    PairRelation::Contradiction => contradictions.push(format!(
                        "{} contradicts {} (contradiction {:.2})",
                        a.source_id, b.source_id, c.contradiction
                    )),
                    PairRelation::Entailment => entailments.push(format!(
                        "{} entails {} (entailment {:.2})",
                        a.source_id, b.source_id, c.entailment
                    )),
                    PairRelation::Neutral => {}
                }
            }
            failed => {
                let error = match failed {
                    Some(Err(e)) => e,
                    _ => InferenceError::Unavailable {
                        backend: adapter.backend_name().to_string(),
                        reason: "classification task did not complete".to_string(),
                    },
                };
                debug!(
                    source_a = %a.source_id,
                    source_b = %b.source_id,
                    error = %error,
                    "pair falls back to lexical overlap"
                );
                score_sum += lexical_disagreement(&a.text, &b.text);
                failures.push(error);
            }
        }
    }

    let score = score_sum / pairs.len() as f64;
    let degraded = !failures.is_empty();
    let confidence = if degraded {
        config.degraded_confidence_floor
    } else {
        confidence_sum / classified as f64
    };
    let severity = if contradictions.is_empty() {
        Severity::None
    } else {
        Severity::Low
    };

    let mut result = DimensionResult::new(Dimension::Pairwise, score, confidence)
        .with_contradictions(contradictions)
        .with_entailments(entailments)
        .with_severity(severity);
    result.degraded = degraded;
    progress.publish(result.score);

    PairwiseOutcome { result, failures }
}
