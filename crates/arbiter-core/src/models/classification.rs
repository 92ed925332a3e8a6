use serde::{Deserialize, Serialize};

use crate::constants::{
    NEUTRAL_PAIR_SCORE, PAIR_CONTRADICTION_THRESHOLD, PAIR_ENTAILMENT_THRESHOLD,
};

/// Soft NLI scores for one ordered pair of statements.
///
/// The three relation scores need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub entailment: f64,
    pub contradiction: f64,
    pub neutral: f64,
    pub confidence: f64,
}

/// Discrete relation derived from a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairRelation {
    Entailment,
    Contradiction,
    Neutral,
}

impl Classification {
    /// Check that every field is finite and inside [0, 1].
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("entailment", self.entailment),
            ("contradiction", self.contradiction),
            ("neutral", self.neutral),
            ("confidence", self.confidence),
        ];
        for (name, value) in fields {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} = {value} is outside [0, 1]"));
            }
        }
        Ok(())
    }

    /// Contradiction wins ties so that a pair scoring high on both is never
    /// read as agreement.
    pub fn relation(&self) -> PairRelation {
        if self.contradiction > PAIR_CONTRADICTION_THRESHOLD {
            PairRelation::Contradiction
        } else if self.entailment > PAIR_ENTAILMENT_THRESHOLD {
            PairRelation::Entailment
        } else {
            PairRelation::Neutral
        }
    }

    /// Disagreement contributed by this pair to the pairwise dimension.
    pub fn pair_score(&self) -> f64 {
        match self.relation() {
            PairRelation::Contradiction => self.contradiction,
            PairRelation::Entailment => 1.0 - self.entailment,
            PairRelation::Neutral => NEUTRAL_PAIR_SCORE,
        }
    }
}
