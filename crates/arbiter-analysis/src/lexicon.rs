//! Vocabulary tables used by the lexical analyzers.

/// Words ignored when measuring shared context.
pub const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "into", "onto", "that", "this", "then", "than", "are",
    "was", "were", "been", "being", "has", "have", "had", "all", "any", "its", "their", "there",
    "before", "after", "while", "when", "until", "each", "every", "must", "should", "shall",
    "will", "can", "may", "not", "only", "also", "but", "per", "via", "you", "your", "our",
    "use", "using", "make", "sure", "ensure",
];

/// A concept with two mutually exclusive states. Each pole lists the
/// phrases (whole tokens, lowercase) that assert it.
#[derive(Debug, Clone, Copy)]
pub struct AntonymPair {
    pub concept: &'static str,
    pub first: &'static [&'static str],
    pub second: &'static [&'static str],
}

pub const ANTONYM_PAIRS: &[AntonymPair] = &[
    AntonymPair {
        concept: "energy state",
        first: &[
            "energized",
            "energised",
            "energize",
            "live",
            "power on",
            "powered on",
            "powered up",
        ],
        second: &[
            "de-energized",
            "de-energised",
            "de-energize",
            "deenergized",
            "deenergize",
            "dead",
            "power off",
            "powered off",
            "powered down",
        ],
    },
    AntonymPair {
        concept: "current type",
        first: &["ac", "alternating current"],
        second: &["dc", "direct current"],
    },
    AntonymPair {
        concept: "switch position",
        first: &["open", "opened"],
        second: &["closed"],
    },
    AntonymPair {
        concept: "grounding",
        first: &["grounded", "earthed"],
        second: &["ungrounded", "unearthed", "floating"],
    },
    AntonymPair {
        concept: "lock state",
        first: &["locked"],
        second: &["unlocked"],
    },
    AntonymPair {
        concept: "rotation",
        first: &["clockwise"],
        second: &[
            "counterclockwise",
            "counter-clockwise",
            "anticlockwise",
            "anti-clockwise",
        ],
    },
    AntonymPair {
        concept: "circuit topology",
        first: &["series"],
        second: &["parallel"],
    },
];

/// Verbs that undo each other. Either side opposes the other.
pub const ANTAGONISTIC_VERBS: &[(&str, &str)] = &[
    ("install", "remove"),
    ("connect", "disconnect"),
    ("engage", "disengage"),
    ("attach", "detach"),
    ("tighten", "loosen"),
    ("open", "close"),
    ("enable", "disable"),
    ("lock", "unlock"),
    ("energize", "de-energize"),
    ("mount", "dismount"),
    ("insert", "extract"),
    ("increase", "decrease"),
    ("apply", "release"),
];

/// Verbs that open an imperative step, besides the antagonistic ones.
pub const IMPERATIVE_VERBS: &[&str] = &[
    "check", "verify", "confirm", "inspect", "test", "measure", "torque", "set", "turn", "switch",
    "replace", "clean", "wait", "wear", "isolate", "secure", "place", "position", "align", "adjust",
    "record", "label", "tag", "reset", "start", "stop", "shut", "power", "ground", "bond",
    "discharge", "drain", "fill", "lubricate", "calibrate", "restore", "return", "push", "pull",
    "press", "hold", "rotate", "slide", "lift", "lower", "cut", "strip", "route", "seal",
];

/// Sequencing adverbs that may precede the verb of a step.
pub const SEQUENCE_WORDS: &[&str] = &[
    "first", "then", "next", "now", "finally", "afterwards", "again", "carefully", "slowly",
    "gently", "always", "immediately", "second", "third", "lastly",
];

/// Terms that mark a sentence as safety-relevant.
pub const SAFETY_TERMS: &[&str] = &[
    "ppe",
    "hazard",
    "hazardous",
    "lock",
    "lockout",
    "lock-out",
    "tagout",
    "tag-out",
    "loto",
    "isolation",
    "isolate",
    "isolated",
    "energized",
    "energised",
    "de-energize",
    "de-energized",
    "de-energise",
    "de-energised",
    "live",
    "power",
    "powered",
    "voltage",
    "breaker",
    "conductor",
    "conductors",
    "shock",
    "arc",
    "arc-flash",
    "gloves",
    "goggles",
    "glasses",
    "helmet",
    "respirator",
    "insulated",
    "danger",
    "warning",
    "caution",
    "safety",
    "safe",
];

/// Whether `token` is an inflection of `base`: `base`, `bases`, `based`,
/// `basing`, with the silent-e drop (`remove` -> `removing`, `removed`).
pub fn is_inflection_of(token: &str, base: &str) -> bool {
    if token == base {
        return true;
    }
    let stem = base.strip_suffix('e').unwrap_or(base);
    [
        format!("{base}s"),
        format!("{base}es"),
        format!("{stem}ed"),
        format!("{stem}ing"),
    ]
    .iter()
    .any(|form| form == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inflections() {
        assert!(is_inflection_of("remove", "remove"));
        assert!(is_inflection_of("removing", "remove"));
        assert!(is_inflection_of("removed", "remove"));
        assert!(is_inflection_of("connects", "connect"));
        assert!(is_inflection_of("connected", "connect"));
        assert!(!is_inflection_of("disconnect", "connect"));
        assert!(!is_inflection_of("de-energize", "energize"));
    }

    #[test]
    fn antonym_poles_are_disjoint() {
        for pair in ANTONYM_PAIRS {
            for phrase in pair.first {
                assert!(!pair.second.contains(phrase), "{} in both poles", phrase);
            }
        }
    }
}
