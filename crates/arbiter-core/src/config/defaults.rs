// Single source of truth for all default values.

// --- Weights ---
pub const DEFAULT_WEIGHT_SAFETY: f64 = 0.40;
pub const DEFAULT_WEIGHT_FACTUAL: f64 = 0.25;
pub const DEFAULT_WEIGHT_PROCEDURE: f64 = 0.20;
pub const DEFAULT_WEIGHT_SEMANTIC: f64 = 0.10;
pub const DEFAULT_WEIGHT_PAIRWISE: f64 = 0.05;

// --- Decision gate ---
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.35;
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.8;
pub const DEFAULT_SAFETY_SATURATION: f64 = 0.9;

// --- Analysis ---
pub const DEFAULT_PAIRWISE_WORKER_POOL_SIZE: usize = 8;
pub const DEFAULT_ANALYZER_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_DEGRADED_CONFIDENCE_FLOOR: f64 = 0.3;

// --- Inference ---
pub const DEFAULT_INFERENCE_CALL_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_INFERENCE_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_INFERENCE_MAX_RETRIES: u32 = 0;

// --- Ledger ---
pub const DEFAULT_LEDGER_MAX_WRITE_ATTEMPTS: u32 = 3;
pub const DEFAULT_LEDGER_BACKOFF_BASE_MS: u64 = 50;

// --- Escalation ---
pub const DEFAULT_ESCALATION_CHANNEL_CAPACITY: usize = 256;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
