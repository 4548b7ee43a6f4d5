//! # forge-engine
//!
//! The knowledge engine is an external collaborator: it owns ingestion,
//! embedding, indexing and retrieval. This crate defines the two seams the
//! hooks talk to and one concrete client for them.
//!
//! - [`KnowledgeEngine`]: `ingest_file`, `ingest_text`, `query`, `sync_to_meta`
//! - [`QualityGates`]: `is_meaningful_session`, `extract_facts`
//! - [`ProcessEngine`]: runs the installed engine program once per call,
//!   JSON request on stdin, JSON response on stdout
//!
//! A client handle is built once per hook invocation from the resolved
//! settings and passed explicitly to the code that needs it.

#![deny(unsafe_code)]

pub mod errors;
pub mod process;
pub mod protocol;
pub mod traits;

pub use errors::EngineError;
pub use process::ProcessEngine;
pub use protocol::EngineOp;
pub use traits::{KnowledgeEngine, QualityGates};
