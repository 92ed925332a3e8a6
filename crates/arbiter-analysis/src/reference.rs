//! Reference-fact validation for specification sources.
//!
//! Declared measurements are checked against the provider's baselines.
//! Significant deviations are folded into the safety dimension (energy
//! conservation, thermal limits) or the factual dimension (everything else)
//! before aggregation, so the gate treats them like any other finding.

use std::collections::HashMap;
use std::sync::Arc;

use arbiter_core::constants::{
    FACTUAL_CONFLICT_WEIGHT, REFERENCE_HIGH_VARIANCE, REFERENCE_MEDIUM_VARIANCE,
    REFERENCE_SIGNIFICANT_VARIANCE, SAFETY_CONFLICT_WEIGHT,
};
use arbiter_core::errors::ConfigError;
use arbiter_core::models::{
    DeclaredMeasurement, Dimension, DimensionResults, PhysicalLaw, ReferenceFact,
    ReferenceFinding, Severity, SourceResponse,
};
use arbiter_core::traits::IReferenceFactProvider;
use serde::Deserialize;
use tracing::debug;

/// Severity implied by the size of a deviation alone.
pub fn magnitude_severity(variance: f64) -> Severity {
    if variance > REFERENCE_HIGH_VARIANCE {
        Severity::High
    } else if variance > REFERENCE_MEDIUM_VARIANCE {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Compare one measurement with one fact.
///
/// `variance = |actual - expected| / |expected|`, significant above 5%. A zero
/// baseline has no relative scale; there the absolute difference must stay
/// within the fact's `tolerance`.
pub fn check_measurement(
    source_id: &str,
    measurement: &DeclaredMeasurement,
    fact: &ReferenceFact,
) -> Option<ReferenceFinding> {
    let actual = measurement.value;
    let expected = fact.expected_value;
    if !actual.is_finite() || !expected.is_finite() {
        return None;
    }

    let variance = if expected == 0.0 {
        let diff = actual.abs();
        if diff <= fact.tolerance {
            return None;
        }
        diff
    } else {
        let variance = (actual - expected).abs() / expected.abs();
        if variance <= REFERENCE_SIGNIFICANT_VARIANCE {
            return None;
        }
        variance
    };

    let severity = if fact.law == PhysicalLaw::EnergyConservation {
        Severity::Critical
    } else {
        fact.severity.max(magnitude_severity(variance))
    };

    Some(ReferenceFinding {
        source_id: source_id.to_string(),
        category: measurement.category.clone(),
        law: fact.law,
        expected,
        actual,
        variance,
        severity,
    })
}

/// Dimension a finding folds into.
pub fn target_dimension(law: PhysicalLaw) -> Dimension {
    if law.is_safety_relevant() {
        Dimension::Safety
    } else {
        Dimension::Factual
    }
}

/// Add each finding to its dimension's score and contradiction list.
pub fn fold_findings(results: &mut DimensionResults, findings: &[ReferenceFinding]) {
    for finding in findings {
        let dimension = target_dimension(finding.law);
        let increment = match dimension {
            Dimension::Safety => SAFETY_CONFLICT_WEIGHT,
            _ => FACTUAL_CONFLICT_WEIGHT,
        };
        results
            .get_mut(dimension)
            .fold_finding(increment, finding.describe(), finding.severity);
    }
}

/// Runs every specification source's measurements past a fact provider.
#[derive(Clone)]
pub struct ReferenceValidator {
    provider: Arc<dyn IReferenceFactProvider>,
}

impl ReferenceValidator {
    pub fn new(provider: Arc<dyn IReferenceFactProvider>) -> Self {
        Self { provider }
    }

    /// All significant findings, in source then measurement order.
    pub fn validate(&self, sources: &[SourceResponse]) -> Vec<ReferenceFinding> {
        let mut findings = Vec::new();
        for source in sources {
            for measurement in source.measurements() {
                let facts = self.provider.facts_for(&measurement.category);
                if facts.is_empty() {
                    debug!(
                        source = %source.source_id,
                        category = %measurement.category,
                        "no reference fact for measurement"
                    );
                }
                findings.extend(
                    facts
                        .iter()
                        .filter_map(|fact| check_measurement(&source.source_id, measurement, fact)),
                );
            }
        }
        findings
    }
}

impl std::fmt::Debug for ReferenceValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceValidator").finish_non_exhaustive()
    }
}

/// In-memory fact table keyed by category.
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceFacts {
    facts: HashMap<String, Vec<ReferenceFact>>,
}

#[derive(Deserialize)]
struct FactTable {
    #[serde(default, rename = "fact")]
    facts: Vec<ReferenceFact>,
}

impl StaticReferenceFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fact(mut self, fact: ReferenceFact) -> Self {
        self.insert(fact);
        self
    }

    pub fn insert(&mut self, fact: ReferenceFact) {
        self.facts.entry(fact.category.clone()).or_default().push(fact);
    }

    /// Load `[[fact]]` tables from TOML.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let table: FactTable = toml::from_str(s).map_err(|e| ConfigError::ParseFailed {
            reason: format!("reference facts: {e}"),
        })?;
        let mut provider = Self::new();
        for fact in table.facts {
            provider.insert(fact);
        }
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.facts.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IReferenceFactProvider for StaticReferenceFacts {
    fn facts_for(&self, category: &str) -> Vec<ReferenceFact> {
        self.facts.get(category).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(law: PhysicalLaw, expected: f64) -> ReferenceFact {
        ReferenceFact {
            category: "c".into(),
            law,
            expected_value: expected,
            tolerance: 0.0,
            severity: Severity::Low,
        }
    }

    fn measured(value: f64) -> DeclaredMeasurement {
        DeclaredMeasurement {
            category: "c".into(),
            value,
            unit: String::new(),
        }
    }

    fn finding(value: f64, law: PhysicalLaw, expected: f64) -> Option<ReferenceFinding> {
        check_measurement("s", &measured(value), &fact(law, expected))
    }

    #[test]
    fn five_percent_is_not_significant() {
        assert!(finding(105.0, PhysicalLaw::OhmsLaw, 100.0).is_none());
        assert!(finding(106.0, PhysicalLaw::OhmsLaw, 100.0).is_some());
    }

    #[test]
    fn severity_follows_magnitude_and_baseline() {
        let low = finding(110.0, PhysicalLaw::OhmsLaw, 100.0).unwrap();
        assert_eq!(low.severity, Severity::Low);
        let medium = finding(130.0, PhysicalLaw::OhmsLaw, 100.0).unwrap();
        assert_eq!(medium.severity, Severity::Medium);
        let high = finding(160.0, PhysicalLaw::OhmsLaw, 100.0).unwrap();
        assert_eq!(high.severity, Severity::High);

        let mut strict = fact(PhysicalLaw::ThermalLimit, 100.0);
        strict.severity = Severity::High;
        let raised = check_measurement("s", &measured(110.0), &strict).unwrap();
        assert_eq!(raised.severity, Severity::High);
    }

    #[test]
    fn energy_conservation_is_always_critical() {
        let f = finding(94.0, PhysicalLaw::EnergyConservation, 100.0).unwrap();
        assert_eq!(f.severity, Severity::Critical);
    }

    #[test]
    fn zero_baseline_uses_absolute_tolerance() {
        let mut zero = fact(PhysicalLaw::PowerBalance, 0.0);
        zero.tolerance = 0.5;
        assert!(check_measurement("s", &measured(0.4), &zero).is_none());
        let f = check_measurement("s", &measured(0.8), &zero).unwrap();
        assert!((f.variance - 0.8).abs() < 1e-12);
    }

    #[test]
    fn findings_fold_into_the_right_dimension() {
        let mut results = DimensionResults::vacuous();
        let thermal = finding(150.0, PhysicalLaw::ThermalLimit, 100.0).unwrap();
        let ohms = finding(150.0, PhysicalLaw::OhmsLaw, 100.0).unwrap();
        fold_findings(&mut results, &[thermal, ohms]);

        assert_eq!(results.safety.score, 1.0);
        assert_eq!(results.safety.contradictions.len(), 1);
        assert!((results.factual.score - 0.8).abs() < 1e-12);
        assert_eq!(results.factual.contradictions.len(), 1);
        assert_eq!(results.semantic.score, 0.0);
    }

    #[test]
    fn facts_load_from_toml() {
        let provider = StaticReferenceFacts::from_toml(
            r#"
            [[fact]]
            category = "bus_voltage"
            law = "ohms_law"
            expected_value = 480.0

            [[fact]]
            category = "enclosure_temp"
            law = "thermal_limit"
            expected_value = 60.0
            severity = "high"
            "#,
        )
        .unwrap();
        assert_eq!(provider.len(), 2);
        assert_eq!(provider.facts_for("bus_voltage")[0].expected_value, 480.0);
        assert_eq!(provider.facts_for("enclosure_temp")[0].severity, Severity::High);
        assert!(provider.facts_for("unknown").is_empty());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = StaticReferenceFacts::from_toml("[[fact]]\nlaw = 3").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }
}
