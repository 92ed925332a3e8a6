//! Span constructors for the arbitration pipeline.

/// Span around one arbitration request.
#[macro_export]
macro_rules! arbitration_span {
    ($request_id:expr, $sources:expr) => {
        tracing::info_span!(
            "arbiter.arbitrate",
            request_id = %$request_id,
            sources = $sources
        )
    };
}

/// Span around one analyzer task.
#[macro_export]
macro_rules! analyzer_span {
    ($dimension:expr) => {
        tracing::debug_span!("arbiter.analyze", dimension = %$dimension)
    };
}

/// Span around the ledger write for a report.
#[macro_export]
macro_rules! ledger_span {
    ($report_id:expr) => {
        tracing::debug_span!("arbiter.ledger_append", report_id = %$report_id)
    };
}

/// Span names, for filtering.
pub mod names {
    pub const ARBITRATE: &str = "arbiter.arbitrate";
    pub const ANALYZE: &str = "arbiter.analyze";
    pub const LEDGER_APPEND: &str = "arbiter.ledger_append";
}
