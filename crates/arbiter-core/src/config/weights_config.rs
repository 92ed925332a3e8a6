use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::WEIGHT_SUM_EPSILON;
use crate::errors::ConfigError;
use crate::models::Dimension;

/// Fixed per-dimension weights for the aggregator.
///
/// Weights are validated, never renormalized: rescaling would make
/// historical scores incomparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionWeights {
    pub safety: f64,
    pub factual: f64,
    pub procedure: f64,
    pub semantic: f64,
    pub pairwise: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            safety: defaults::DEFAULT_WEIGHT_SAFETY,
            factual: defaults::DEFAULT_WEIGHT_FACTUAL,
            procedure: defaults::DEFAULT_WEIGHT_PROCEDURE,
            semantic: defaults::DEFAULT_WEIGHT_SEMANTIC,
            pairwise: defaults::DEFAULT_WEIGHT_PAIRWISE,
        }
    }
}

impl DimensionWeights {
    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Safety => self.safety,
            Dimension::Factual => self.factual,
            Dimension::Procedure => self.procedure,
            Dimension::Semantic => self.semantic,
            Dimension::Pairwise => self.pairwise,
        }
    }

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.weight(*d)).sum()
    }

    /// Each weight must be finite and non-negative, and together they must
    /// sum to 1.0 within `WEIGHT_SUM_EPSILON`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for d in Dimension::ALL {
            let w = self.weight(d);
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("weights.{d}"),
                    reason: format!("{w} is not a finite non-negative number"),
                });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightSumInvalid {
                sum,
                epsilon: WEIGHT_SUM_EPSILON,
            });
        }
        Ok(())
    }
}
