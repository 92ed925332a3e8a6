//! ArbitrationEngine: fork the analyzers, join by label, gate, record, escalate.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use arbiter_analysis::dimensions::pairwise::{self, lexical_disagreement, PairwiseOutcome};
use arbiter_analysis::dimensions::{analyze_lexical, source_pairs, LEXICAL_DIMENSIONS};
use arbiter_analysis::reference::fold_findings;
use arbiter_analysis::ReferenceValidator;
use arbiter_core::config::ArbiterConfig;
use arbiter_core::errors::{ArbiterError, ArbiterResult, InferenceError, LedgerError};
use arbiter_core::models::{
    ContradictionReport, DegradationEvent, Dimension, DimensionResult, DimensionResults,
    PartialDimensionResults, Severity, SourceResponse,
};
use arbiter_core::traits::{IInferenceBackend, IReferenceFactProvider};
use arbiter_escalation::{EnqueueOutcome, EscalationQueue};
use arbiter_inference::{HttpInferenceBackend, InferenceAdapter};
use arbiter_ledger::EvidenceLedger;
use arbiter_observability::tracing_setup::events;
use arbiter_observability::ArbitrationMetrics;
use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{info, Instrument};

use crate::aggregator::aggregate;
use crate::context::ArbitrationContext;
use crate::gate::DecisionGate;

/// How one analyzer task ended.
enum AnalyzerOutcome {
    Finished {
        result: DimensionResult,
        failures: Vec<InferenceError>,
    },
    TimedOut,
    Failed(String),
}

/// The arbitration engine.
///
/// Shareable across tasks behind an `Arc`; every request carries its own
/// [`ArbitrationContext`], and the only state shared between requests is
/// the ledger, the escalation queue, the classification cache, and the
/// metrics counters.
pub struct ArbitrationEngine<B: IInferenceBackend> {
    config: ArbiterConfig,
    adapter: Arc<InferenceAdapter<B>>,
    gate: DecisionGate,
    validator: Option<ReferenceValidator>,
    ledger: Arc<EvidenceLedger>,
    escalation: Arc<EscalationQueue>,
    metrics: Arc<ArbitrationMetrics>,
}

impl<B: IInferenceBackend> ArbitrationEngine<B> {
    /// Validate `config` and build an engine around `backend`.
    ///
    /// Refuses to start on any invalid configuration, including weights that
    /// do not sum to 1.
    pub fn new(backend: B, config: ArbiterConfig) -> ArbiterResult<Self> {
        config.validate()?;
        let ledger = EvidenceLedger::from_config(&config.ledger)?;
        info!(
            backend = backend.name(),
            score_threshold = config.gate.score_threshold,
            confidence_floor = config.gate.confidence_floor,
            pool = config.analysis.pairwise_worker_pool_size,
            "arbitration engine ready"
        );
        Ok(Self {
            adapter: Arc::new(InferenceAdapter::new(backend, &config.inference)),
            gate: DecisionGate::new(config.gate.clone()),
            validator: None,
            ledger: Arc::new(ledger),
            escalation: Arc::new(EscalationQueue::new(&config.escalation)),
            metrics: Arc::new(ArbitrationMetrics::new()),
            config,
        })
    }

    /// Check specification sources against `provider`'s reference facts.
    pub fn with_reference_facts(mut self, provider: Arc<dyn IReferenceFactProvider>) -> Self {
        self.validator = Some(ReferenceValidator::new(provider));
        self
    }

    /// Write decisions to `ledger` instead of the one built from config.
    pub fn with_ledger(mut self, ledger: EvidenceLedger) -> Self {
        self.ledger = Arc::new(ledger);
        self
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn adapter(&self) -> &InferenceAdapter<B> {
        &self.adapter
    }

    pub fn ledger(&self) -> &Arc<EvidenceLedger> {
        &self.ledger
    }

    pub fn escalation(&self) -> &Arc<EscalationQueue> {
        &self.escalation
    }

    pub fn metrics(&self) -> &ArbitrationMetrics {
        &self.metrics
    }

    /// Arbitrate one set of source responses.
    ///
    /// Returns a report even when analyzers degrade. Errors only for invalid
    /// input or when the decision could not be made durable; after a ledger
    /// failure every call errors until the process is restarted.
    pub async fn arbitrate(&self, sources: &[SourceResponse]) -> ArbiterResult<ContradictionReport> {
        self.run(sources, None).await
    }

    /// Arbitrate again and record the result as a correction of
    /// `supersedes`. The earlier report is left untouched.
    pub async fn arbitrate_correction(
        &self,
        sources: &[SourceResponse],
        supersedes: &str,
    ) -> ArbiterResult<ContradictionReport> {
        if supersedes.trim().is_empty() {
            return Err(self.reject("correction must name the report it supersedes".to_string()));
        }
        self.run(sources, Some(supersedes.to_string())).await
    }

    async fn run(
        &self,
        sources: &[SourceResponse],
        supersedes: Option<String>,
    ) -> ArbiterResult<ContradictionReport> {
        if self.ledger.is_halted() {
            return Err(LedgerError::Halted {
                sequence: self.ledger.len().await,
            }
            .into());
        }
        if let Err(reason) = validate_sources(sources) {
            return Err(self.reject(reason));
        }

        let ctx = ArbitrationContext::new(uuid::Uuid::new_v4().to_string());
        let span = arbiter_observability::arbitration_span!(ctx.request_id(), sources.len());
        self.decide(ctx, sources, supersedes).instrument(span).await
    }

    async fn decide(
        &self,
        ctx: ArbitrationContext,
        sources: &[SourceResponse],
        supersedes: Option<String>,
    ) -> ArbiterResult<ContradictionReport> {
        let mut results = if sources.len() < 2 {
            DimensionResults::vacuous()
        } else {
            self.analyze(&ctx, sources).await
        };

        if sources.len() >= 2 {
            if let Some(validator) = &self.validator {
                let findings = validator.validate(sources);
                fold_findings(&mut results, &findings);
            }
        }

        let aggregate = aggregate(&results, &self.config.weights);
        let outcome = self.gate.decide(&results, &aggregate, sources.len());
        let max_severity = if outcome.has_critical_finding() {
            Severity::Critical
        } else {
            results.max_severity()
        };
        let degraded_dimensions = results.degraded_dimensions().len();

        let report = ContradictionReport {
            id: ctx.request_id().to_string(),
            overall_score: aggregate.overall_score,
            per_dimension: results.into_vec(),
            aggregate_confidence: aggregate.aggregate_confidence,
            decision: outcome.decision,
            max_severity,
            reasons: outcome.reasons,
            degradations: ctx.take_degradations(),
            supersedes,
            source_ids: sources.iter().map(|s| s.source_id.clone()).collect(),
            created_at: Utc::now(),
        };

        // The gate has decided. From here on the ledger append, the ticket
        // and the counters run on their own task and finish even if the
        // caller stops waiting.
        let tail = PostGate {
            ledger: Arc::clone(&self.ledger),
            escalation: Arc::clone(&self.escalation),
            metrics: Arc::clone(&self.metrics),
        };
        let span = arbiter_observability::ledger_span!(report.id);
        let committed = tokio::spawn(tail.commit(report, ctx, degraded_dimensions).instrument(span));
        match committed.await {
            Ok(result) => result,
            Err(e) => Err(ArbiterError::TaskFailed {
                reason: format!("post-gate commit: {e}"),
            }),
        }
    }

    /// Run all five analyzers concurrently and join them by label.
    ///
    /// Each analyzer has its own wall-clock budget. A failed or timed-out
    /// analyzer is replaced by a degraded result; the others are untouched.
    /// Dropping the returned future aborts every analyzer still running.
    async fn analyze(&self, ctx: &ArbitrationContext, sources: &[SourceResponse]) -> DimensionResults {
        let timeout = Duration::from_millis(self.config.analysis.analyzer_timeout_ms);
        let shared: Arc<[SourceResponse]> = Arc::from(sources);
        let mut tasks: JoinSet<(Dimension, AnalyzerOutcome)> = JoinSet::new();

        {
            let adapter = Arc::clone(&self.adapter);
            let sources = Arc::clone(&shared);
            let config = self.config.analysis.clone();
            let progress = ctx.progress(Dimension::Pairwise).clone();
            tasks.spawn(
                async move {
                    let run = pairwise::analyze(adapter, &sources, &config, &progress);
                    let outcome = match tokio::time::timeout(timeout, run).await {
                        Ok(PairwiseOutcome { result, failures }) => {
                            AnalyzerOutcome::Finished { result, failures }
                        }
                        Err(_) => AnalyzerOutcome::TimedOut,
                    };
                    (Dimension::Pairwise, outcome)
                }
                .instrument(arbiter_observability::analyzer_span!(Dimension::Pairwise)),
            );
        }

        for dimension in LEXICAL_DIMENSIONS {
            let sources = Arc::clone(&shared);
            tasks.spawn(
                async move {
                    let run = tokio::task::spawn_blocking(move || analyze_lexical(dimension, &sources));
                    let outcome = match tokio::time::timeout(timeout, run).await {
                        Ok(Ok(Some(result))) => AnalyzerOutcome::Finished {
                            result,
                            failures: Vec::new(),
                        },
                        Ok(Ok(None)) => AnalyzerOutcome::Failed(format!("no analyzer for {dimension}")),
                        Ok(Err(e)) => AnalyzerOutcome::Failed(e.to_string()),
                        Err(_) => AnalyzerOutcome::TimedOut,
                    };
                    (dimension, outcome)
                }
                .instrument(arbiter_observability::analyzer_span!(dimension)),
            );
        }

        let mut partial = PartialDimensionResults::new();
        while let Some(joined) = tasks.join_next().await {
            let (dimension, outcome) = match joined {
                Ok(done) => done,
                // Caught below as a missing dimension.
                Err(e) => {
                    tracing::warn!(error = %e, "analyzer task failed to join");
                    continue;
                }
            };
            match outcome {
                AnalyzerOutcome::Finished { result, failures } => {
                    if let Some(first) = failures.first() {
                        ctx.record_degradation(DegradationEvent::now(
                            dimension.name(),
                            format!(
                                "{} of {} pair classifications failed: {first}",
                                failures.len(),
                                source_pairs(sources.len()).len()
                            ),
                            "lexical overlap",
                        ));
                    }
                    partial.insert(result);
                }
                AnalyzerOutcome::TimedOut => ctx.record_degradation(DegradationEvent::now(
                    dimension.name(),
                    format!("timed out after {} ms", timeout.as_millis()),
                    substitute_label(dimension),
                )),
                AnalyzerOutcome::Failed(reason) => ctx.record_degradation(DegradationEvent::now(
                    dimension.name(),
                    format!("analyzer failed: {reason}"),
                    substitute_label(dimension),
                )),
            }
        }

        for dimension in partial.missing() {
            if !ctx.has_degradation(dimension.name()) {
                ctx.record_degradation(DegradationEvent::now(
                    dimension.name(),
                    "analyzer task did not complete",
                    substitute_label(dimension),
                ));
            }
        }

        let floor = self.config.analysis.degraded_confidence_floor;
        partial.complete_with(|dimension| {
            let last_good = match ctx.progress(dimension).last_good() {
                Some(score) => score,
                None if dimension == Dimension::Pairwise => lexical_pairwise_estimate(sources),
                None => 0.0,
            };
            DimensionResult::degraded(dimension, last_good, floor)
        })
    }

    fn reject(&self, reason: String) -> ArbiterError {
        self.metrics.record_rejected_input();
        events::input_rejected(&reason);
        ArbiterError::InvalidInput { reason }
    }
}

/// Shared state the post-gate task needs once a decision exists.
struct PostGate {
    ledger: Arc<EvidenceLedger>,
    escalation: Arc<EscalationQueue>,
    metrics: Arc<ArbitrationMetrics>,
}

impl PostGate {
    /// Ledger first, then the ticket. A report that never reached the
    /// ledger never gets a ticket.
    async fn commit(
        self,
        report: ContradictionReport,
        ctx: ArbitrationContext,
        degraded_dimensions: usize,
    ) -> ArbiterResult<ContradictionReport> {
        match self.ledger.append_report(&report).await {
            Ok(entry) => events::ledger_appended(&report.id, entry.sequence, entry.entry_type.name()),
            Err(e) => {
                self.metrics.record_ledger_failure();
                if self.ledger.is_halted() {
                    events::ledger_halted(&report.id, &e.to_string());
                }
                return Err(e.into());
            }
        }

        if report.decision.requires_escalation() {
            match self.escalation.enqueue(&report)? {
                EnqueueOutcome::Created(ticket) => events::escalation_enqueued(&ticket),
                EnqueueOutcome::Backlogged(ticket) => {
                    events::escalation_backlogged(&ticket, self.escalation.stats().backlog)
                }
                EnqueueOutcome::Duplicate { .. } => {}
            }
        }

        let elapsed_ms = ctx.elapsed_ms();
        self.metrics
            .record_decision(report.decision, degraded_dimensions, elapsed_ms);
        events::contradiction_detected(&report);
        events::arbitration_decided(&report, elapsed_ms);
        Ok(report)
    }
}

impl ArbitrationEngine<HttpInferenceBackend> {
    /// Engine backed by the HTTP classifier at `config.inference.endpoint`.
    pub fn http(config: ArbiterConfig) -> ArbiterResult<Self> {
        let backend = HttpInferenceBackend::from_config("http", &config.inference)?;
        Self::new(backend, config)
    }
}

impl<B: IInferenceBackend> std::fmt::Debug for ArbitrationEngine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbitrationEngine")
            .field("backend", &self.adapter.backend_name())
            .field("ledger", &self.ledger)
            .field("escalation", &self.escalation)
            .finish_non_exhaustive()
    }
}

fn substitute_label(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Pairwise => "last-good score or lexical overlap",
        _ => "last-good score",
    }
}

/// Mean lexical disagreement over every pair.
fn lexical_pairwise_estimate(sources: &[SourceResponse]) -> f64 {
    let pairs = source_pairs(sources.len());
    if pairs.is_empty() {
        return 0.0;
    }
    pairs
        .iter()
        .map(|&(i, j)| lexical_disagreement(&sources[i].text, &sources[j].text))
        .sum::<f64>()
        / pairs.len() as f64
}

/// Source ids must be unique and self-reported confidences in [0, 1].
fn validate_sources(sources: &[SourceResponse]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(sources.len());
    for source in sources {
        if !seen.insert(source.source_id.as_str()) {
            return Err(format!("duplicate source id {}", source.source_id));
        }
        if !(0.0..=1.0).contains(&source.self_reported_confidence) {
            return Err(format!(
                "source {} reports confidence {} outside [0, 1]",
                source.source_id, source.self_reported_confidence
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(id: &str, confidence: f64) -> SourceResponse {
        SourceResponse::free_text(id, "Open the breaker.", confidence)
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = validate_sources(&[src("a", 0.9), src("b", 0.9), src("a", 0.5)]).unwrap_err();
        assert!(err.contains("duplicate source id a"));
    }

    #[test]
    fn confidence_must_be_a_unit_value() {
        assert!(validate_sources(&[src("a", 1.2)]).is_err());
        assert!(validate_sources(&[src("a", -0.1)]).is_err());
        assert!(validate_sources(&[src("a", f64::NAN)]).is_err());
        assert!(validate_sources(&[src("a", 0.0), src("b", 1.0)]).is_ok());
        assert!(validate_sources(&[]).is_ok());
    }

    #[test]
    fn lexical_estimate_is_zero_for_identical_texts() {
        assert_eq!(lexical_pairwise_estimate(&[src("a", 0.9), src("b", 0.9)]), 0.0);
        assert_eq!(lexical_pairwise_estimate(&[src("a", 0.9)]), 0.0);
    }
}
