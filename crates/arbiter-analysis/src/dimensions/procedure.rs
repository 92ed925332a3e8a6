//! Procedure-step dimension: antagonistic verbs acting on the same context.
//!
//! Steps are imperative sentences, in order. A step in one source conflicts
//! with a step in another when their verbs undo each other (connect vs
//! disconnect) and they share more than `PROCEDURE_MIN_SHARED_TOKENS` context
//! words. A source that contains both directions for the same context (remove
//! the old fuse, install the new one) is not in conflict with itself or with
//! a source that does the same.

use std::collections::HashSet;

use arbiter_core::constants::{PROCEDURE_CONFLICT_WEIGHT, PROCEDURE_MIN_SHARED_TOKENS};
use arbiter_core::models::{Dimension, DimensionResult, Severity, SourceResponse};

use super::{saturating_score, source_pairs};
use crate::lexicon::{
    is_inflection_of, ANTAGONISTIC_VERBS, IMPERATIVE_VERBS, SEQUENCE_WORDS, STOPWORDS,
};
use crate::text::{excerpt, sentences, strip_list_marker, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// One antagonistic verb occurrence: index into `ANTAGONISTIC_VERBS` plus side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerbUse {
    pub pair: usize,
    pub direction: Direction,
}

impl VerbUse {
    pub fn verb(self) -> &'static str {
        let (forward, reverse) = ANTAGONISTIC_VERBS[self.pair];
        match self.direction {
            Direction::Forward => forward,
            Direction::Reverse => reverse,
        }
    }
}

/// An imperative step extracted from a source.
#[derive(Debug, Clone)]
pub struct Step {
    /// 1-based position among the source's steps.
    pub position: usize,
    pub text: String,
    pub verbs: Vec<VerbUse>,
    pub context: HashSet<String>,
}

impl Step {
    fn has(&self, pair: usize, direction: Direction) -> bool {
        self.verbs
            .iter()
            .any(|v| v.pair == pair && v.direction == direction)
    }

    fn shares_context(&self, other: &Step) -> bool {
        self.context.intersection(&other.context).count() > PROCEDURE_MIN_SHARED_TOKENS
    }
}

fn verb_use(token: &str) -> Option<VerbUse> {
    ANTAGONISTIC_VERBS
        .iter()
        .enumerate()
        .find_map(|(pair, (forward, reverse))| {
            if is_inflection_of(token, forward) {
                Some(VerbUse {
                    pair,
                    direction: Direction::Forward,
                })
            } else if is_inflection_of(token, reverse) {
                Some(VerbUse {
                    pair,
                    direction: Direction::Reverse,
                })
            } else {
                None
            }
        })
}

fn opens_step(token: &str) -> bool {
    IMPERATIVE_VERBS.contains(&token)
        || ANTAGONISTIC_VERBS
            .iter()
            .any(|(forward, reverse)| token == *forward || token == *reverse)
}

/// Imperative steps of `text`, in order.
pub fn extract_steps(text: &str) -> Vec<Step> {
    let mut steps = Vec::new();
    for sentence in sentences(text) {
        let body = strip_list_marker(sentence);
        let tokens = tokenize(body);
        let Some(first) = tokens
            .iter()
            .find(|t| !SEQUENCE_WORDS.contains(&t.as_str()))
        else {
            continue;
        };
        if !opens_step(first) {
            continue;
        }

        let mut verbs = Vec::new();
        let mut context = HashSet::new();
        for token in &tokens {
            if let Some(v) = verb_use(token) {
                if !verbs.contains(&v) {
                    verbs.push(v);
                }
            } else if token.len() > 2
                && !STOPWORDS.contains(&token.as_str())
                && !SEQUENCE_WORDS.contains(&token.as_str())
            {
                context.insert(token.clone());
            }
        }

        steps.push(Step {
            position: steps.len() + 1,
            text: excerpt(body),
            verbs,
            context,
        });
    }
    steps
}

/// Whether any step in `steps` applies `direction` of `pair` to a context
/// overlapping `like`.
fn source_does(steps: &[Step], pair: usize, direction: Direction, like: &Step) -> bool {
    steps
        .iter()
        .any(|s| s.has(pair, direction) && s.shares_context(like))
}

/// The verb pair on which `a` and `b` conflict, if any.
fn conflict(
    a: &Step,
    b: &Step,
    a_steps: &[Step],
    b_steps: &[Step],
) -> Option<(VerbUse, VerbUse)> {
    if !a.shares_context(b) {
        return None;
    }
    a.verbs.iter().find_map(|&va| {
        let opposite = va.direction.flip();
        if !b.has(va.pair, opposite) || a.has(va.pair, opposite) || b.has(va.pair, va.direction) {
            return None;
        }
        // Both sources perform both directions on this context: no disagreement.
        if source_does(a_steps, va.pair, opposite, b)
            || source_does(b_steps, va.pair, va.direction, a)
        {
            return None;
        }
        Some((
            va,
            VerbUse {
                pair: va.pair,
                direction: opposite,
            },
        ))
    })
}

pub fn analyze(sources: &[SourceResponse]) -> DimensionResult {
    if sources.len() < 2 {
        return DimensionResult::vacuous(Dimension::Procedure);
    }

    let steps: Vec<Vec<Step>> = sources.iter().map(|s| extract_steps(&s.text)).collect();
    let mut contradictions = Vec::new();
    let mut severity = Severity::None;

    for (i, j) in source_pairs(sources.len()) {
        for a in &steps[i] {
            for b in &steps[j] {
                if let Some((va, vb)) = conflict(a, b, &steps[i], &steps[j]) {
                    // Energize against de-energize is a safety matter too.
                    let step_severity = if va.verb().contains("energize") {
                        Severity::High
                    } else {
                        Severity::Medium
                    };
                    severity = severity.max(step_severity);
                    contradictions.push(format!(
                        "{} step {} '{}' ({}) vs {} step {} '{}' ({})",
                        sources[i].source_id,
                        a.position,
                        a.text,
                        va.verb(),
                        sources[j].source_id,
                        b.position,
                        b.text,
                        vb.verb()
                    ));
                }
            }
        }
    }

    DimensionResult::new(
        Dimension::Procedure,
        saturating_score(PROCEDURE_CONFLICT_WEIGHT, contradictions.len()),
        1.0,
    )
    .with_contradictions(contradictions)
    .with_severity(severity)
}
