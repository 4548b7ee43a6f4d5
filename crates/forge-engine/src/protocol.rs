//! Wire format between [`ProcessEngine`](crate::ProcessEngine) and the
//! installed engine program.
//!
//! Each call runs `<program> [args..] <op>`. The request is one JSON object on
//! stdin; ops that return data print one JSON value on stdout. Store scopes
//! travel as plain paths.

use std::fmt;
use std::path::Path;

use forge_core::FactMetadata;
use serde::{Deserialize, Serialize};

/// Engine operation, passed as the last command-line argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOp {
    /// Index one file into a store.
    IngestFile,
    /// Index one text record into a store.
    IngestText,
    /// Retrieve top-k fragments.
    Query,
    /// Replicate a project store into the meta store.
    SyncMeta,
    /// Significance gate.
    IsMeaningful,
    /// Structured fact extraction.
    ExtractFacts,
}

impl EngineOp {
    /// Command-line name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IngestFile => "ingest-file",
            Self::IngestText => "ingest-text",
            Self::Query => "query",
            Self::SyncMeta => "sync-meta",
            Self::IsMeaningful => "is-meaningful",
            Self::ExtractFacts => "extract-facts",
        }
    }
}

impl fmt::Display for EngineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `ingest-file` request.
#[derive(Debug, Serialize)]
pub struct IngestFileRequest<'a> {
    /// File to index.
    pub path: &'a Path,
    /// Target store.
    pub scope: &'a Path,
}

/// `ingest-text` request.
#[derive(Debug, Serialize)]
pub struct IngestTextRequest<'a> {
    /// Record body.
    pub text: &'a str,
    /// Status, source type and timestamp.
    pub metadata: &'a FactMetadata,
    /// Target store.
    pub scope: &'a Path,
}

/// `query` request. Response: JSON array of `{text, ...}`.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    /// Retrieval prompt.
    pub prompt: &'a str,
    /// Store to search.
    pub scope: &'a Path,
    /// Maximum number of hits.
    pub top_k: usize,
}

/// `sync-meta` request.
#[derive(Debug, Serialize)]
pub struct SyncMetaRequest<'a> {
    /// Source project store.
    pub project: &'a Path,
    /// Destination meta store.
    pub meta: &'a Path,
}

/// `is-meaningful` and `extract-facts` request.
#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    /// Session transcript.
    pub text: &'a str,
}

/// `is-meaningful` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MeaningfulResponse {
    /// Gate verdict.
    pub meaningful: bool,
}
