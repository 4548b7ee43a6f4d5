//! Pre-compaction capture summary.
//!
//! Built in a single pass over the transcript. Matching lines are kept
//! verbatim (trimmed) in transcript order and truncated to the earliest
//! [`MAX_DECISIONS`] / [`MAX_ACTIONS`]; there is no recency weighting.

use crate::classify::classify_line;

/// Decision lines kept in a summary.
pub const MAX_DECISIONS: usize = 10;

/// Action lines kept in a summary.
pub const MAX_ACTIONS: usize = 5;

/// Characters that end a transcript line: every Unicode line boundary.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Condensed record of decisions and action items in a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSummary {
    decisions: Vec<String>,
    actions: Vec<String>,
    matched: usize,
}

impl CaptureSummary {
    /// Scan `transcript`. Returns `None` when no line matched either
    /// vocabulary.
    #[must_use]
    pub fn from_transcript(transcript: &str) -> Option<Self> {
        let mut decisions = Vec::new();
        let mut actions = Vec::new();
        let mut matched = 0;

        for line in split_lines(transcript) {
            let class = classify_line(line);
            if class.decision {
                matched += 1;
                if decisions.len() < MAX_DECISIONS {
                    decisions.push(line.trim().to_string());
                }
            }
            if class.action {
                matched += 1;
                if actions.len() < MAX_ACTIONS {
                    actions.push(line.trim().to_string());
                }
            }
        }

        if matched == 0 {
            return None;
        }
        Some(Self {
            decisions,
            actions,
            matched,
        })
    }

    /// Kept decision lines.
    #[must_use]
    pub fn decisions(&self) -> &[String] {
        &self.decisions
    }

    /// Kept action lines.
    #[must_use]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Matches before truncation; a line hitting both vocabularies counts twice.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.matched
    }

    /// Ingestion text: a `Decisions:` section then an `Action items:` section,
    /// empty sections omitted, separated by a blank line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sections = Vec::with_capacity(2);
        if !self.decisions.is_empty() {
            sections.push(section("Decisions:", &self.decisions));
        }
        if !self.actions.is_empty() {
            sections.push(section("Action items:", &self.actions));
        }
        sections.join("\n\n")
    }
}

fn section(header: &str, lines: &[String]) -> String {
    let mut out = String::from(header);
    for line in lines {
        out.push_str("\n- ");
        out.push_str(line);
    }
    out
}

/// Non-empty lines of `text`, broken at any of [`LINE_BREAKS`]. A `\r\n`
/// pair leaves an empty piece between its halves, which is dropped.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(LINE_BREAKS).filter(|line| !line.is_empty())
}
