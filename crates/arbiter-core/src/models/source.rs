use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DeclaredMeasurement;

/// One independently produced statement about a procedure.
///
/// Produced by the upstream generation pipeline; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceResponse {
    pub source_id: String,
    pub text: String,
    /// The producer's own confidence, in [0, 1].
    pub self_reported_confidence: f64,
    pub produced_at: DateTime<Utc>,
    #[serde(default)]
    pub kind: SourceKind,
}

impl SourceResponse {
    /// A free-text source produced now.
    pub fn free_text(
        source_id: impl Into<String>,
        text: impl Into<String>,
        self_reported_confidence: f64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
            self_reported_confidence,
            produced_at: Utc::now(),
            kind: SourceKind::FreeText,
        }
    }

    /// A manufacturer specification carrying declared measurements.
    pub fn specification(
        source_id: impl Into<String>,
        text: impl Into<String>,
        measurements: Vec<DeclaredMeasurement>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
            self_reported_confidence: 1.0,
            produced_at: Utc::now(),
            kind: SourceKind::Specification { measurements },
        }
    }

    /// Declared measurements, empty for free text.
    pub fn measurements(&self) -> &[DeclaredMeasurement] {
        match &self.kind {
            SourceKind::FreeText => &[],
            SourceKind::Specification { measurements } => measurements,
        }
    }
}

/// What kind of document a source is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    FreeText,
    Specification {
        measurements: Vec<DeclaredMeasurement>,
    },
}
