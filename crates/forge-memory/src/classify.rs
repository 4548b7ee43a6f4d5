//! Transcript line classification.
//!
//! Two independent fixed vocabularies, matched as case-insensitive substrings
//! with no stemming. A line may hit both, either, or neither. False positives
//! are acceptable here: this runs right before context is compressed and must
//! stay cheap.

use std::sync::LazyLock;

use regex::Regex;

/// Phrases that mark a line as recording a decision.
pub const DECISION_VOCABULARY: &[&str] = &[
    "decided",
    "agreed",
    "will use",
    "confirmed",
    "chosen",
    "selected",
    "approved",
    "settled on",
];

/// Phrases that mark a line as an action item.
pub const ACTION_VOCABULARY: &[&str] = &["TODO", "FIXME", "action item", "next step"];

static DECISION_PATTERN: LazyLock<Regex> = LazyLock::new(|| vocabulary_pattern(DECISION_VOCABULARY));
static ACTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| vocabulary_pattern(ACTION_VOCABULARY));

fn vocabulary_pattern(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)({alternation})")).expect("valid regex")
}

/// Classification of one transcript line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineClass {
    /// Line contains decision vocabulary.
    pub decision: bool,
    /// Line contains action vocabulary.
    pub action: bool,
}

impl LineClass {
    /// Neither vocabulary matched.
    #[must_use]
    pub fn is_neither(self) -> bool {
        !self.decision && !self.action
    }
}

/// Classify one line against both vocabularies.
#[must_use]
pub fn classify_line(line: &str) -> LineClass {
    LineClass {
        decision: DECISION_PATTERN.is_match(line),
        action: ACTION_PATTERN.is_match(line),
    }
}
