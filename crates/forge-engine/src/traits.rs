//! Collaborator traits.
//!
//! Implementations are external: the hooks never look inside a store. Every
//! method may fail; callers decide whether a failure is recorded or
//! propagated to the hook boundary.

use std::path::Path;

use async_trait::async_trait;
use forge_core::{ExtractedFact, FactMetadata, KnowledgeFact, QueryHit, StoreScope};

use crate::errors::EngineError;

/// Ingestion and retrieval against project and meta stores.
#[async_trait]
pub trait KnowledgeEngine: Send + Sync {
    /// Index one file's content into `scope`.
    async fn ingest_file(&self, path: &Path, scope: &StoreScope) -> Result<(), EngineError>;

    /// Index one text record with its metadata into `scope`.
    async fn ingest_text(
        &self,
        text: &str,
        metadata: &FactMetadata,
        scope: &StoreScope,
    ) -> Result<(), EngineError>;

    /// Retrieve up to `top_k` fragments relevant to `prompt`, best first.
    async fn query(
        &self,
        prompt: &str,
        scope: &StoreScope,
        top_k: usize,
    ) -> Result<Vec<QueryHit>, EngineError>;

    /// Replicate the project store's facts into the meta store.
    async fn sync_to_meta(&self, project: &StoreScope, meta: &StoreScope)
    -> Result<(), EngineError>;

    /// Ingest a [`KnowledgeFact`] as one text record.
    async fn ingest_fact(&self, fact: &KnowledgeFact, scope: &StoreScope) -> Result<(), EngineError> {
        self.ingest_text(&fact.text, &fact.metadata(), scope).await
    }
}

/// Opaque session classifiers.
#[async_trait]
pub trait QualityGates: Send + Sync {
    /// Whether the session produced anything worth persisting.
    async fn is_meaningful_session(&self, text: &str) -> Result<bool, EngineError>;

    /// Structured facts found in the session text.
    async fn extract_facts(&self, text: &str) -> Result<Vec<ExtractedFact>, EngineError>;
}
