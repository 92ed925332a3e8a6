//! Semantic-concept dimension: opposite members of a known antonym pair.

use arbiter_core::constants::SEMANTIC_CONFLICT_WEIGHT;
use arbiter_core::models::{Dimension, DimensionResult, Severity, SourceResponse};

use super::{saturating_score, source_pairs};
use crate::lexicon::{AntonymPair, ANTONYM_PAIRS};
use crate::text::{contains_phrase, normalized};

/// Which pole of an antonym pair a source asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    First(&'static str),
    Second(&'static str),
}

impl Stance {
    fn opposes(self, other: Stance) -> bool {
        matches!(
            (self, other),
            (Stance::First(_), Stance::Second(_)) | (Stance::Second(_), Stance::First(_))
        )
    }

    fn phrase(self) -> &'static str {
        match self {
            Stance::First(p) | Stance::Second(p) => p,
        }
    }
}

/// The stance a text takes on `pair`. A text naming both poles takes none.
pub fn stance(text_normalized: &str, pair: &AntonymPair) -> Option<Stance> {
    let first = pair
        .first
        .iter()
        .find(|p| contains_phrase(text_normalized, p))
        .copied();
    let second = pair
        .second
        .iter()
        .find(|p| contains_phrase(text_normalized, p))
        .copied();
    match (first, second) {
        (Some(p), None) => Some(Stance::First(p)),
        (None, Some(p)) => Some(Stance::Second(p)),
        _ => None,
    }
}

pub fn analyze(sources: &[SourceResponse]) -> DimensionResult {
    if sources.len() < 2 {
        return DimensionResult::vacuous(Dimension::Semantic);
    }

    let texts: Vec<String> = sources.iter().map(|s| normalized(&s.text)).collect();
    let mut contradictions = Vec::new();

    for pair in ANTONYM_PAIRS {
        let stances: Vec<Option<Stance>> = texts.iter().map(|t| stance(t, pair)).collect();
        for (i, j) in source_pairs(sources.len()) {
            if let (Some(a), Some(b)) = (stances[i], stances[j]) {
                if a.opposes(b) {
                    contradictions.push(format!(
                        "{}: {} says '{}' but {} says '{}'",
                        pair.concept,
                        sources[i].source_id,
                        a.phrase(),
                        sources[j].source_id,
                        b.phrase()
                    ));
                }
            }
        }
    }

    let severity = if contradictions.is_empty() {
        Severity::None
    } else {
        Severity::Medium
    };
    DimensionResult::new(
        Dimension::Semantic,
        saturating_score(SEMANTIC_CONFLICT_WEIGHT, contradictions.len()),
        1.0,
    )
    .with_contradictions(contradictions)
    .with_severity(severity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(id: &str, text: &str) -> SourceResponse {
        SourceResponse::free_text(id, text, 0.9)
    }

    #[test]
    fn opposite_states_conflict() {
        let r = analyze(&[
            src("a", "Work only on de-energized conductors."),
            src("b", "The conductors remain energized during the check."),
        ]);
        assert_eq!(r.contradictions.len(), 1);
        assert!((r.score - 0.7).abs() < 1e-12);
        assert!(r.contradictions[0].starts_with("energy state"));
    }

    #[test]
    fn same_state_is_consistent() {
        let r = analyze(&[
            src("a", "Verify the breaker is open."),
            src("b", "With the breaker open, remove the cover."),
        ]);
        assert!(r.contradictions.is_empty());
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn text_naming_both_poles_takes_no_stance() {
        let pair = &ANTONYM_PAIRS[1];
        assert_eq!(stance(&normalized("convert AC to DC"), pair), None);
        assert_eq!(
            stance(&normalized("a 24 V DC supply"), pair),
            Some(Stance::Second("dc"))
        );
    }

    #[test]
    fn multiple_conflicts_saturate() {
        let r = analyze(&[
            src("a", "Use the AC input with the switch open."),
            src("b", "Use the DC input with the switch closed."),
        ]);
        assert_eq!(r.contradictions.len(), 2);
        assert_eq!(r.score, 1.0);
    }

    #[test]
    fn single_source_is_vacuous() {
        let r = analyze(&[src("a", "energized")]);
        assert_eq!(r.score, 0.0);
        assert_eq!(r.confidence, 1.0);
    }
}
