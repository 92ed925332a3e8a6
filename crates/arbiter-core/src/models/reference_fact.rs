use serde::{Deserialize, Serialize};

use super::Severity;

/// A baseline value from the domain-rule provider, keyed by measurement category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFact {
    pub category: String,
    pub law: PhysicalLaw,
    pub expected_value: f64,
    /// Absolute tolerance, used when `expected_value` is zero.
    #[serde(default)]
    pub tolerance: f64,
    /// Minimum severity of any significant deviation from this fact.
    #[serde(default)]
    pub severity: Severity,
}

/// Which physical relationship a reference fact encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalLaw {
    EnergyConservation,
    OhmsLaw,
    PowerBalance,
    ThermalLimit,
    MechanicalTorque,
    Other,
}

impl PhysicalLaw {
    /// Violations of these laws fold into the safety dimension.
    pub fn is_safety_relevant(self) -> bool {
        matches!(self, PhysicalLaw::EnergyConservation | PhysicalLaw::ThermalLimit)
    }

    pub fn name(self) -> &'static str {
        match self {
            PhysicalLaw::EnergyConservation => "energy_conservation",
            PhysicalLaw::OhmsLaw => "ohms_law",
            PhysicalLaw::PowerBalance => "power_balance",
            PhysicalLaw::ThermalLimit => "thermal_limit",
            PhysicalLaw::MechanicalTorque => "mechanical_torque",
            PhysicalLaw::Other => "other",
        }
    }
}

/// A numeric measurement declared by a specification source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredMeasurement {
    pub category: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

/// A significant deviation of a declared measurement from its reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFinding {
    pub source_id: String,
    pub category: String,
    pub law: PhysicalLaw,
    pub expected: f64,
    pub actual: f64,
    pub variance: f64,
    pub severity: Severity,
}

impl ReferenceFinding {
    pub fn describe(&self) -> String {
        format!(
            "{}: {} declared {} = {}, reference {} ({:.1}% variance, {})",
            self.law.name(),
            self.source_id,
            self.category,
            self.actual,
            self.expected,
            self.variance * 100.0,
            self.severity.name()
        )
    }
}
