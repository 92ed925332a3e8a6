use serde::{Deserialize, Serialize};

/// Severity of a finding. Ordered so that `max()` yields the dominant one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No finding at all.
    #[default]
    None,
    Low,
    Medium,
    High,
    /// Forces BLOCK at the decision gate.
    Critical,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn is_critical(self) -> bool {
        self == Severity::Critical
    }
}
