//! Package-level constants.

/// Prefix for lines the hooks print into the host session.
pub const OUTPUT_PREFIX: &str = "[RAG]";
