//! Factual-claim dimension: same-unit numeric claims that disagree.

use std::sync::LazyLock;

use arbiter_core::constants::{FACTUAL_CONFLICT_WEIGHT, FACTUAL_RELATIVE_TOLERANCE};
use arbiter_core::models::{Dimension, DimensionResult, Severity, SourceResponse};
use regex::Regex;

use super::{saturating_score, source_pairs};
use crate::reference::magnitude_severity;

/// A number followed by a unit-like word. The leading group keeps numbers
/// glued to letters (`M8`, `v2`) from matching.
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^\w.])(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*([\p{L}°%][\w°%·/.\-]*)",
    )
    .unwrap()
});

/// A numeric claim extracted from one source.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub value: f64,
    pub unit: &'static str,
}

/// Map a unit spelling to its canonical symbol. Unknown units yield `None`
/// and the number is ignored.
pub fn canonical_unit(raw: &str) -> Option<&'static str> {
    let unit = raw
        .trim_end_matches(['.', '-', '/'])
        .to_lowercase()
        .replace('·', "-");
    let canonical = match unit.as_str() {
        "ft-lb" | "ft-lbs" | "ftlb" | "ftlbs" | "ft-lbf" | "lb-ft" | "lbf-ft" | "lbs-ft"
        | "foot-pound" | "foot-pounds" | "ft/lb" => "ft-lb",
        "nm" | "n-m" | "newton-meter" | "newton-meters" | "newton-metre" | "newton-metres" => {
            "N·m"
        }
        "in-lb" | "in-lbs" | "inch-pound" | "inch-pounds" => "in-lb",
        "v" | "volt" | "volts" | "vac" | "vdc" => "V",
        "kv" => "kV",
        "mv" => "mV",
        "a" | "amp" | "amps" | "ampere" | "amperes" => "A",
        "ma" => "mA",
        "w" | "watt" | "watts" => "W",
        "kw" => "kW",
        "hz" => "Hz",
        "ohm" | "ohms" | "ω" => "Ω",
        "°c" | "degc" | "celsius" => "°C",
        "°f" | "degf" | "fahrenheit" => "°F",
        "psi" => "psi",
        "bar" => "bar",
        "kpa" => "kPa",
        "mm" => "mm",
        "cm" => "cm",
        "rpm" => "rpm",
        "%" => "%",
        "s" | "sec" | "secs" | "second" | "seconds" => "s",
        "min" | "mins" | "minute" | "minutes" => "min",
        "h" | "hr" | "hrs" | "hour" | "hours" => "h",
        _ => return None,
    };
    Some(canonical)
}

/// Every `(value, unit)` claim in `text`, in order of appearance.
pub fn extract_claims(text: &str) -> Vec<Claim> {
    QUANTITY_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let value: f64 = caps[1].replace(',', "").parse().ok()?;
            let unit = canonical_unit(&caps[2])?;
            value.is_finite().then_some(Claim { value, unit })
        })
        .collect()
}

/// `|a - b| / min(|a|, |b|)`. Distinct values where one is zero differ
/// infinitely.
pub fn relative_difference(a: f64, b: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    let smaller = a.abs().min(b.abs());
    if smaller == 0.0 {
        f64::INFINITY
    } else {
        (a - b).abs() / smaller
    }
}

/// The claim in `others` nearest to `claim` with the same unit, if none of
/// them agrees within tolerance. `None` when some claim agrees or when
/// `others` says nothing in that unit.
fn unmatched_against<'a>(claim: &Claim, others: &'a [Claim]) -> Option<&'a Claim> {
    let mut nearest: Option<(&Claim, f64)> = None;
    for other in others.iter().filter(|o| o.unit == claim.unit) {
        let diff = relative_difference(claim.value, other.value);
        if diff <= FACTUAL_RELATIVE_TOLERANCE {
            return None;
        }
        if nearest.map_or(true, |(_, best)| diff < best) {
            nearest = Some((other, diff));
        }
    }
    nearest.map(|(c, _)| c)
}

pub fn analyze(sources: &[SourceResponse]) -> DimensionResult {
    if sources.len() < 2 {
        return DimensionResult::vacuous(Dimension::Factual);
    }

    let claims: Vec<Vec<Claim>> = sources.iter().map(|s| extract_claims(&s.text)).collect();
    // (unit, low, high) already reported, so 35 vs 45 counts once no matter
    // which side found it.
    let mut seen: Vec<(&'static str, f64, f64)> = Vec::new();
    let mut contradictions = Vec::new();
    let mut severity = Severity::None;

    for (i, j) in source_pairs(sources.len()) {
        // Every disagreement as (claim in i, claim in j), found from either side.
        let from_i = claims[i]
            .iter()
            .filter_map(|a| unmatched_against(a, &claims[j]).map(|b| (a, b)));
        let from_j = claims[j]
            .iter()
            .filter_map(|b| unmatched_against(b, &claims[i]).map(|a| (a, b)));

        for (a, b) in from_i.chain(from_j) {
            let (low, high) = if a.value <= b.value {
                (a.value, b.value)
            } else {
                (b.value, a.value)
            };
            if seen.contains(&(a.unit, low, high)) {
                continue;
            }
            seen.push((a.unit, low, high));

            let diff = relative_difference(a.value, b.value);
            severity = severity.max(magnitude_severity(diff));
            contradictions.push(format!(
                "{}: {} states {} {} but {} states {} {} ({:.1}% apart)",
                a.unit,
                sources[i].source_id,
                a.value,
                a.unit,
                sources[j].source_id,
                b.value,
                b.unit,
                diff * 100.0
            ));
        }
    }

    DimensionResult::new(
        Dimension::Factual,
        saturating_score(FACTUAL_CONFLICT_WEIGHT, contradictions.len()),
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
    fn extracts_value_unit_pairs() {
        let claims = extract_claims("Torque to 35 ft-lb, then apply 1,200 V for 10 s.");
        assert_eq!(
            claims,
            vec![
                Claim { value: 35.0, unit: "ft-lb" },
                Claim { value: 1200.0, unit: "V" },
                Claim { value: 10.0, unit: "s" },
            ]
        );
    }

    #[test]
    fn ignores_unitless_and_glued_numbers() {
        assert!(extract_claims("Step 2. Use an M8 bolt on bay 3").is_empty());
    }

    #[test]
    fn unit_spellings_normalize() {
        assert_eq!(canonical_unit("ft-lbs"), Some("ft-lb"));
        assert_eq!(canonical_unit("lb-ft."), Some("ft-lb"));
        assert_eq!(canonical_unit("N·m"), Some("N·m"));
        assert_eq!(canonical_unit("Volts"), Some("V"));
        assert_eq!(canonical_unit("bananas"), None);
    }

    #[test]
    fn torque_mismatch_is_flagged() {
        let r = analyze(&[
            src("a", "Torque to 35 ft-lb."),
            src("b", "Torque to 45 ft-lb."),
        ]);
        assert_eq!(r.contradictions.len(), 1);
        assert!((r.score - 0.8).abs() < 1e-12);
        assert!(r.contradictions[0].contains("28.6% apart"));
        assert_eq!(r.severity, Severity::Medium);
    }

    #[test]
    fn within_tolerance_agrees() {
        let r = analyze(&[
            src("a", "Torque to 40 ft-lb."),
            src("b", "Torque to 43 ft-lbs."),
        ]);
        assert!(r.contradictions.is_empty());
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn different_units_are_not_compared() {
        let r = analyze(&[
            src("a", "Torque to 35 ft-lb."),
            src("b", "Torque to 47 N·m."),
        ]);
        assert!(r.contradictions.is_empty());
    }

    #[test]
    fn relative_difference_uses_smaller_magnitude() {
        assert!((relative_difference(35.0, 45.0) - 10.0 / 35.0).abs() < 1e-12);
        assert_eq!(relative_difference(0.0, 0.0), 0.0);
        assert_eq!(relative_difference(0.0, 1.0), f64::INFINITY);
    }
}
