use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl Strength {
    pub fn from_score(score: u8) -> Self {
        if score < 3 {
            Strength::Weak
        } else if score < 5 {
            Strength::Medium
        } else {
            Strength::Strong
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Medium => "medium",
            Strength::Strong => "strong",
        }
    }

    /// Filled cells of a three-cell meter.
    pub fn bars(&self) -> usize {
        match self {
            Strength::Weak => 1,
            Strength::Medium => 2,
            Strength::Strong => 3,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct ClassPatterns {
    lower: Regex,
    upper: Regex,
    digit: Regex,
    other: Regex,
}

fn patterns() -> &'static ClassPatterns {
    static PATTERNS: OnceLock<ClassPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ClassPatterns {
        lower: Regex::new("[a-z]").expect("Failed to compile lowercase regex"),
        upper: Regex::new("[A-Z]").expect("Failed to compile uppercase regex"),
        digit: Regex::new("[0-9]").expect("Failed to compile digit regex"),
        other: Regex::new("[^A-Za-z0-9]").expect("Failed to compile symbol regex"),
    })
}

/// One point each for: length >= 8, length >= 12, a-z, A-Z, 0-9, anything else. 0..=6.
///
/// Length is measured in UTF-16 code units so scores agree with the desktop app, where a
/// character outside the Basic Multilingual Plane counts twice.
pub fn score(password: &str) -> u8 {
    let p = patterns();
    let len = password.encode_utf16().count();
    [
        len >= 8,
        len >= 12,
        p.lower.is_match(password),
        p.upper.is_match(password),
        p.digit.is_match(password),
        p.other.is_match(password),
    ]
    .iter()
    .filter(|&&hit| hit)
    .count() as u8
}

pub fn classify(password: &str) -> Strength {
    Strength::from_score(score(password))
}
