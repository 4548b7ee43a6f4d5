//! Append-only session log.
//!
//! One Markdown entry per session end that produced facts. The file is only
//! ever opened with create+append; prior entries are never rewritten.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use forge_core::FactStatus;
use tracing::debug;

use crate::errors::MemoryError;

/// Per-status fact counts for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactTally {
    /// `confirmed` facts.
    pub confirmed: usize,
    /// `draft` facts.
    pub draft: usize,
    /// `action_item` facts.
    pub action_items: usize,
}

impl FactTally {
    /// Count one fact.
    pub fn record(&mut self, status: FactStatus) {
        match status {
            FactStatus::Confirmed => self.confirmed += 1,
            FactStatus::Draft => self.draft += 1,
            FactStatus::ActionItem => self.action_items += 1,
        }
    }

    /// Total facts counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.confirmed + self.draft + self.action_items
    }
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLogEntry {
    /// When the session ended.
    pub timestamp: DateTime<Utc>,
    /// Counts by status.
    pub tally: FactTally,
    /// Whether the meta-store sync succeeded.
    pub meta_synced: bool,
}

impl SessionLogEntry {
    /// Entry stamped now.
    #[must_use]
    pub fn new(tally: FactTally, meta_synced: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            tally,
            meta_synced,
        }
    }

    /// Total facts extracted.
    #[must_use]
    pub fn facts_extracted(&self) -> usize {
        self.tally.total()
    }

    /// Markdown block, starting with a blank line so consecutive entries stay
    /// separated.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "\n## Session {}\n- Facts extracted: {}\n- Confirmed: {}, Draft: {}, Action items: {}\n- Meta-RAG synced: {}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, false),
            self.facts_extracted(),
            self.tally.confirmed,
            self.tally.draft,
            self.tally.action_items,
            if self.meta_synced { "yes" } else { "no" },
        )
    }
}

/// Handle on a project's session log file.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    /// Log at `path`. Nothing is touched until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file if needed.
    pub fn append(&self, entry: &SessionLogEntry) -> Result<(), MemoryError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| MemoryError::io("open session log", &self.path, e))?;
        file.write_all(entry.render().as_bytes())
            .map_err(|e| MemoryError::io("append session log", &self.path, e))?;
        debug!(path = %self.path.display(), facts = entry.facts_extracted(), "session log appended");
        Ok(())
    }
}
