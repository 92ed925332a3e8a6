// Scoring constants shared by the analyzers and the gate.
// Tunable operator knobs live in `config::defaults`; these are fixed by the scoring model.

// --- Pairwise entailment ---
pub const PAIR_CONTRADICTION_THRESHOLD: f64 = 0.6;
pub const PAIR_ENTAILMENT_THRESHOLD: f64 = 0.6;
pub const NEUTRAL_PAIR_SCORE: f64 = 0.2;
/// Scale applied to `1 - lexical_similarity` when the backend is unavailable.
pub const LEXICAL_FALLBACK_SCALE: f64 = 0.5;

// --- Per-conflict score increments ---
pub const SEMANTIC_CONFLICT_WEIGHT: f64 = 0.7;
pub const FACTUAL_CONFLICT_WEIGHT: f64 = 0.8;
pub const PROCEDURE_CONFLICT_WEIGHT: f64 = 0.6;
pub const SAFETY_CONFLICT_WEIGHT: f64 = 1.0;

// --- Extraction thresholds ---
/// Relative difference above which two same-unit claims disagree.
pub const FACTUAL_RELATIVE_TOLERANCE: f64 = 0.10;
/// Shared context tokens must exceed this for antagonistic steps to conflict.
pub const PROCEDURE_MIN_SHARED_TOKENS: usize = 2;

// --- Reference facts ---
pub const REFERENCE_SIGNIFICANT_VARIANCE: f64 = 0.05;
pub const REFERENCE_HIGH_VARIANCE: f64 = 0.5;
pub const REFERENCE_MEDIUM_VARIANCE: f64 = 0.2;

// --- Aggregation ---
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;

// --- Ledger ---
/// `previous_hash` of the first ledger entry.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";
