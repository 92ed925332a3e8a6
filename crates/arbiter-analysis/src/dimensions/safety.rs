//! Safety-requirement dimension: opposite safety postures.
//!
//! Only sentences carrying a safety-lexicon term are read. Each is classified
//! on two axes, energy state and PPE, and two sources whose postures on an
//! axis are opposite conflict. A single conflict saturates the dimension.

use std::sync::LazyLock;

use arbiter_core::constants::SAFETY_CONFLICT_WEIGHT;
use arbiter_core::models::{Dimension, DimensionResult, Severity, SourceResponse};
use regex::Regex;

use super::{saturating_score, source_pairs};
use crate::lexicon::SAFETY_TERMS;
use crate::text::{excerpt, sentences, tokenize};

static DE_ENERGIZED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)\b(?:
            de-?energi[sz](?:e|ed|es|ing)
          | power(?:ed)?\s+(?:off|down)
          | (?:turn|switch|shut)(?:ed|ing|s)?\s+(?:off|down)
          | lock(?:ed|ing)?[-\s]?out | tag(?:ged|ging)?[-\s]?out | loto
          | isolat(?:e|ed|es|ing|ion)
          | zero[-\s]energy
          | disconnect(?:ed|ing)?\s+(?:the\s+)?(?:power|supply|mains|source)
        )\b",
    )
    .unwrap()
});

static ENERGIZED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)\b(?:
            energi[sz](?:e|ed|es|ing)
          | live
          | hot[-\s]work
          | power(?:ed)?\s+(?:on|up)
          | with\s+(?:the\s+)?power\s+(?:applied|connected)
          | while\s+(?:powered|running|operating)
          | under\s+(?:power|load)
        )\b",
    )
    .unwrap()
});

static PPE_WAIVED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
            \b(?:no|without)\s+(?:\w+\s+)?(?:ppe|gloves|protective\s+equipment|face\s+shield|goggles)\b
          | \b(?:ppe|gloves|protective\s+equipment)\b[^.;]*?
            \b(?:not\s+(?:required|needed|necessary)|optional|unnecessary)\b",
    )
    .unwrap()
});

static PPE_REQUIRED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
            \b(?:wear|wearing|don|put\s+on)\b[^.;]*?
            \b(?:ppe|gloves|protective\s+equipment|face\s+shield|goggles|arc[-\s]flash\s+(?:suit|gear))\b
          | \b(?:ppe|gloves|protective\s+equipment)\b[^.;]*?\b(?:required|mandatory)\b",
    )
    .unwrap()
});

const NEGATIONS: &[&str] = &["no", "not", "never", "without", "nor"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyAxis {
    EnergyState,
    Ppe,
}

impl SafetyAxis {
    pub fn name(self) -> &'static str {
        match self {
            SafetyAxis::EnergyState => "energy state",
            SafetyAxis::Ppe => "ppe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    DeEnergized,
    Energized,
    PpeRequired,
    PpeWaived,
}

impl Posture {
    pub fn axis(self) -> SafetyAxis {
        match self {
            Posture::DeEnergized | Posture::Energized => SafetyAxis::EnergyState,
            Posture::PpeRequired | Posture::PpeWaived => SafetyAxis::Ppe,
        }
    }

    pub fn opposite(self) -> Posture {
        match self {
            Posture::DeEnergized => Posture::Energized,
            Posture::Energized => Posture::DeEnergized,
            Posture::PpeRequired => Posture::PpeWaived,
            Posture::PpeWaived => Posture::PpeRequired,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Posture::DeEnergized => "requires de-energized work",
            Posture::Energized => "works energized",
            Posture::PpeRequired => "requires PPE",
            Posture::PpeWaived => "waives PPE",
        }
    }
}

/// A safety sentence and the postures it asserts.
#[derive(Debug, Clone)]
pub struct SafetyStatement {
    pub text: String,
    pub postures: Vec<Posture>,
}

/// Whether the few words before byte offset `at` negate what follows.
fn negated_before(sentence: &str, at: usize) -> bool {
    tokenize(&sentence[..at])
        .iter()
        .rev()
        .take(3)
        .any(|w| NEGATIONS.contains(&w.as_str()))
}

fn is_safety_sentence(sentence: &str) -> bool {
    tokenize(sentence)
        .iter()
        .any(|t| SAFETY_TERMS.contains(&t.as_str()))
}

/// Postures asserted by one sentence. Negated matches assert the opposite
/// ("never work live" is a de-energized posture).
pub fn postures(sentence: &str) -> Vec<Posture> {
    let mut found = Vec::new();
    let mut push = |p: Posture| {
        if !found.contains(&p) {
            found.push(p);
        }
    };

    for m in DE_ENERGIZED_RE.find_iter(sentence) {
        if negated_before(sentence, m.start()) {
            push(Posture::Energized);
        } else {
            push(Posture::DeEnergized);
        }
    }
    // "de-energized" contains "energized"; blank the de-energized phrases out
    // before looking for energized ones.
    let remainder = DE_ENERGIZED_RE.replace_all(sentence, |caps: &regex::Captures| {
        " ".repeat(caps[0].len())
    });
    for m in ENERGIZED_RE.find_iter(&remainder) {
        if negated_before(&remainder, m.start()) {
            push(Posture::DeEnergized);
        } else {
            push(Posture::Energized);
        }
    }

    if PPE_WAIVED_RE.is_match(sentence) {
        push(Posture::PpeWaived);
    }
    let remainder = PPE_WAIVED_RE.replace_all(sentence, " ");
    if PPE_REQUIRED_RE.is_match(&remainder) {
        push(Posture::PpeRequired);
    }

    found
}

/// Safety-relevant sentences of `text` with their postures.
pub fn extract_statements(text: &str) -> Vec<SafetyStatement> {
    sentences(text)
        .into_iter()
        .filter(|s| is_safety_sentence(s))
        .map(|s| SafetyStatement {
            text: excerpt(s),
            postures: postures(s),
        })
        .collect()
}

/// A source's single posture on `axis` with its evidence, or `None` if it
/// takes none or takes both sides.
fn stance_on(statements: &[SafetyStatement], axis: SafetyAxis) -> Option<(Posture, &str)> {
    let mut stance: Option<(Posture, &str)> = None;
    for statement in statements {
        for &p in statement.postures.iter().filter(|p| p.axis() == axis) {
            match stance {
                None => stance = Some((p, statement.text.as_str())),
                Some((current, _)) if current == p => {}
                Some(_) => return None,
            }
        }
    }
    stance
}

pub fn analyze(sources: &[SourceResponse]) -> DimensionResult {
    if sources.len() < 2 {
        return DimensionResult::vacuous(Dimension::Safety);
    }

    let statements: Vec<Vec<SafetyStatement>> = sources
        .iter()
        .map(|s| extract_statements(&s.text))
        .collect();
    let mut contradictions = Vec::new();

    for axis in [SafetyAxis::EnergyState, SafetyAxis::Ppe] {
        let stances: Vec<Option<(Posture, &str)>> =
            statements.iter().map(|s| stance_on(s, axis)).collect();
        for (i, j) in source_pairs(sources.len()) {
            let (Some((a, a_text)), Some((b, b_text))) = (stances[i], stances[j]) else {
                continue;
            };
            if a.opposite() == b {
                contradictions.push(format!(
                    "{}: {} {} (\"{}\") but {} {} (\"{}\")",
                    axis.name(),
                    sources[i].source_id,
                    a.describe(),
                    a_text,
                    sources[j].source_id,
                    b.describe(),
                    b_text
                ));
            }
        }
    }

    let severity = if contradictions.is_empty() {
        Severity::None
    } else {
        Severity::High
    };
    DimensionResult::new(
        Dimension::Safety,
        saturating_score(SAFETY_CONFLICT_WEIGHT, contradictions.len()),
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
    fn de_energized_is_not_read_as_energized() {
        assert_eq!(postures("De-energize before testing"), vec![Posture::DeEnergized]);
        assert_eq!(
            postures("Verify the feeder is de-energized"),
            vec![Posture::DeEnergized]
        );
    }

    #[test]
    fn energized_phrases() {
        assert_eq!(postures("Test with power on"), vec![Posture::Energized]);
        assert_eq!(
            postures("Measure while running under load"),
            vec![Posture::Energized]
        );
    }

    #[test]
    fn negation_flips_posture() {
        assert_eq!(postures("Never work on live conductors"), vec![Posture::DeEnergized]);
    }

    #[test]
    fn ppe_postures() {
        assert_eq!(postures("Wear insulated gloves"), vec![Posture::PpeRequired]);
        assert_eq!(postures("PPE is not required for this check"), vec![Posture::PpeWaived]);
        assert_eq!(postures("No PPE required"), vec![Posture::PpeWaived]);
    }

    #[test]
    fn energy_state_conflict_saturates() {
        let r = analyze(&[
            src("a", "De-energize before testing."),
            src("b", "Test with power on."),
        ]);
        assert_eq!(r.contradictions.len(), 1);
        assert_eq!(r.score, 1.0);
        assert_eq!(r.severity, Severity::High);
        assert!(r.contradictions[0].starts_with("energy state: a requires de-energized work"));
    }

    #[test]
    fn consistent_postures_do_not_conflict() {
        let r = analyze(&[
            src("a", "Lock out the breaker. Wear gloves."),
            src("b", "Isolate the supply and wear rated gloves."),
        ]);
        assert!(r.contradictions.is_empty(), "{:?}", r.contradictions);
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn source_taking_both_sides_is_not_counted() {
        let r = analyze(&[
            src("a", "De-energize the panel. Re-energize and test with power on."),
            src("b", "Test with power on."),
        ]);
        assert!(r.contradictions.is_empty());
    }

    #[test]
    fn non_safety_sentences_are_ignored() {
        let statements = extract_statements("Open the lid. Wear gloves.");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].text, "Wear gloves");
    }
}
