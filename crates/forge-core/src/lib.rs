//! # forge-core
//!
//! Foundation types, constants, and logging for the forge RAG hooks.
//!
//! This crate provides the shared vocabulary every other forge crate depends on:
//!
//! - **Facts**: [`KnowledgeFact`] with its [`FactStatus`] and [`SourceType`],
//!   plus the [`FactMetadata`] sent alongside every ingested record
//! - **Extraction**: [`ExtractedFact`] as returned by the upstream extractor
//! - **Stores**: [`StoreScope`] addressing the project or meta store by path
//! - **Logging**: stderr-only `tracing` subscriber and test capture helpers

#![deny(unsafe_code)]

pub mod constants;
pub mod facts;
pub mod logging;

pub use facts::{
    ExtractedFact, FactMetadata, FactStatus, KnowledgeFact, QueryHit, SourceType, StoreKind,
    StoreScope,
};
