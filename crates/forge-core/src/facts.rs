//! Knowledge facts and store addressing.
//!
//! A [`KnowledgeFact`] is the unit the hooks hand to the knowledge engine. It
//! carries exactly one [`FactStatus`] and one [`SourceType`]; the engine only
//! ever sees them flattened into a [`FactMetadata`] record next to the text.
//! All wire types use `snake_case`, matching the engine's metadata keys.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Lifecycle status of an ingested fact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactStatus {
    /// Settled knowledge. Eligible for cross-project sync.
    #[default]
    Confirmed,
    /// Tentative, e.g. captured right before compaction.
    Draft,
    /// Follow-up work rather than knowledge.
    ActionItem,
}

impl FactStatus {
    /// Wire label used in engine metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Draft => "draft",
            Self::ActionItem => "action_item",
        }
    }

    /// Parse a wire label. Returns `None` for anything unrecognised.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "confirmed" => Some(Self::Confirmed),
            "draft" => Some(Self::Draft),
            "action_item" => Some(Self::ActionItem),
            _ => None,
        }
    }
}

impl fmt::Display for FactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which hook produced a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Summary captured right before context compaction.
    CompactionCapture,
    /// Fact extracted when a session ends.
    SessionExtraction,
}

impl SourceType {
    /// Wire label used in engine metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompactionCapture => "compaction_capture",
            Self::SessionExtraction => "session_extraction",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to every `ingest_text` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactMetadata {
    /// Producing hook.
    pub source_type: SourceType,
    /// Fact status.
    pub status: FactStatus,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
}

/// A status-tagged, timestamped unit of knowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeFact {
    /// Fact body, ingested verbatim.
    pub text: String,
    /// Exactly one status per fact.
    pub status: FactStatus,
    /// Exactly one source per fact.
    pub source_type: SourceType,
    /// When the fact was produced.
    pub created_at: DateTime<Utc>,
}

impl KnowledgeFact {
    /// Create a fact stamped with the current time.
    #[must_use]
    pub fn new(text: impl Into<String>, status: FactStatus, source_type: SourceType) -> Self {
        Self {
            text: text.into(),
            status,
            source_type,
            created_at: Utc::now(),
        }
    }

    /// Metadata record for the engine.
    #[must_use]
    pub fn metadata(&self) -> FactMetadata {
        FactMetadata {
            source_type: self.source_type,
            status: self.status,
            created_at: self
                .created_at
                .to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}

/// One entry produced by the upstream fact extractor.
///
/// The extractor may omit `status`; see [`ExtractedFact::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFact {
    /// Fact text.
    pub fact: String,
    /// Raw status label, if the extractor supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ExtractedFact {
    /// Build an extracted fact (mostly for tests and fakes).
    #[must_use]
    pub fn new(fact: impl Into<String>, status: Option<FactStatus>) -> Self {
        Self {
            fact: fact.into(),
            status: status.map(|s| s.as_str().to_string()),
        }
    }

    /// Resolved status. Missing or unrecognised labels become `Confirmed`.
    #[must_use]
    pub fn status(&self) -> FactStatus {
        match self.status.as_deref() {
            None => FactStatus::Confirmed,
            Some(label) => FactStatus::parse(label).unwrap_or_else(|| {
                warn!(label, "unknown fact status, treating as confirmed");
                FactStatus::Confirmed
            }),
        }
    }

    /// Convert into a [`KnowledgeFact`] stamped now.
    #[must_use]
    pub fn into_fact(self, source_type: SourceType) -> KnowledgeFact {
        let status = self.status();
        KnowledgeFact::new(self.fact, status, source_type)
    }
}

/// One retrieved fragment. Only `text` is interpreted; everything else the
/// engine returns is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHit {
    /// Fragment text.
    pub text: String,
    /// Engine-specific fields (score, source, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl QueryHit {
    /// Hit with no extra fields.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// First `max_chars` characters of the text.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

/// Which knowledge store a scope addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Store local to one project.
    Project,
    /// Store shared by every project under one installation.
    Meta,
}

/// A knowledge store addressed by filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreScope {
    kind: StoreKind,
    path: PathBuf,
}

impl StoreScope {
    /// Project store rooted at the project directory.
    #[must_use]
    pub fn project(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: StoreKind::Project,
            path: path.into(),
        }
    }

    /// Meta store at the given path.
    #[must_use]
    pub fn meta(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: StoreKind::Meta,
            path: path.into(),
        }
    }

    /// Store kind.
    #[must_use]
    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    /// Store path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
