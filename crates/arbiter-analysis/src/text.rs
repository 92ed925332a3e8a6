//! Tokenization, sentence splitting, and lexical overlap.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::STOPWORDS;

/// Sentence boundaries: terminal punctuation followed by whitespace or end of
/// text, or a line break. Decimal points inside numbers are not boundaries.
static SENTENCE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?;]+(?:\s+|$)|\n+").unwrap());

/// Leading list markers such as `1.`, `2)`, `-`, `*`, `Step 3:`.
static LIST_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:step\s+\d+\s*[:.)-]?|\d+\s*[.):-]|[-*•])\s*").unwrap()
});

/// Lowercased word tokens. Hyphens inside a word are kept so that
/// `de-energize` stays distinct from `energize`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Tokens worth comparing: no stopwords, at least three characters.
pub fn content_tokens(text: &str) -> HashSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.len() > 2 && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Tokens joined by single spaces and padded on both ends, for whole-phrase
/// matching with `contains(" phrase ")`.
pub fn normalized(text: &str) -> String {
    let mut out = String::from(" ");
    for token in tokenize(text) {
        out.push_str(&token);
        out.push(' ');
    }
    out
}

/// Whether `phrase` occurs as whole tokens inside a [`normalized`] string.
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    normalized.contains(&format!(" {phrase} "))
}

/// Split text into trimmed, non-empty sentences.
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Strip a leading list marker from a sentence.
pub fn strip_list_marker(sentence: &str) -> &str {
    match LIST_MARKER_RE.find(sentence) {
        Some(m) => &sentence[m.end()..],
        None => sentence,
    }
}

/// Jaccard similarity of two token sets. Two empty sets are identical.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Shorten a quoted excerpt for contradiction descriptions.
pub fn excerpt(text: &str) -> String {
    const MAX_CHARS: usize = 80;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX_CHARS).collect();
        format!("{cut}...")
    }
}
