//! Core types for the hooks.

use std::fmt;

/// Lifecycle point a hook fires at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookType {
    /// After the host edited or wrote a file.
    PostToolUse,
    /// Before context compaction.
    PreCompact,
    /// When the session ends.
    SessionEnd,
    /// When a session starts.
    SessionStart,
}

impl HookType {
    /// All hook types.
    #[must_use]
    pub fn all() -> &'static [HookType] {
        &[
            Self::PostToolUse,
            Self::PreCompact,
            Self::SessionEnd,
            Self::SessionStart,
        ]
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostToolUse => write!(f, "PostToolUse"),
            Self::PreCompact => write!(f, "PreCompact"),
            Self::SessionEnd => write!(f, "SessionEnd"),
            Self::SessionStart => write!(f, "SessionStart"),
        }
    }
}

/// Why a hook did nothing. These are normal outcomes, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The project has no `.rag/` directory.
    NoKnowledgeDir,
    /// No installation root could be resolved.
    NoInstallRoot,
    /// The edit payload was not valid JSON.
    MalformedPayload,
    /// The edit payload carried no file path.
    EmptyFilePath,
    /// The edited file's extension is never ingested.
    NonIngestable,
    /// No transcript text was available.
    EmptyTranscript,
    /// No transcript line matched either vocabulary.
    NothingMatched,
    /// The significance gate rejected the session.
    NotMeaningful,
    /// The extractor found no facts.
    NoFacts,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoKnowledgeDir => "no knowledge directory",
            Self::NoInstallRoot => "installation root unresolved",
            Self::MalformedPayload => "malformed edit payload",
            Self::EmptyFilePath => "empty file path",
            Self::NonIngestable => "non-ingestable file type",
            Self::EmptyTranscript => "empty transcript",
            Self::NothingMatched => "no decisions or action items",
            Self::NotMeaningful => "session not meaningful",
            Self::NoFacts => "no facts extracted",
        };
        f.write_str(reason)
    }
}

/// Result of a hook that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome<T> {
    /// The hook did its work.
    Completed(T),
    /// The hook had nothing to do.
    Skipped(SkipReason),
}

impl<T> HookOutcome<T> {
    /// Whether the hook did its work.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Skip reason, if skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Completed(_) => None,
            Self::Skipped(reason) => Some(*reason),
        }
    }
}
