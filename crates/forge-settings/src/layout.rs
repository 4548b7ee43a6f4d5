//! Filesystem layout of a project and of an installation.
//!
//! Project (`<root>` is the working directory the host runs hooks in):
//! - `<root>/.rag/`: knowledge directory; its presence gates every hook
//! - `<root>/.rag/.last-query`: throttle marker (mtime only)
//! - `<root>/.rag/session-log.md`: append-only session log
//! - `<root>/.claude/session-context.md`: fallback transcript at session end
//!
//! Installation (`<home>` is the resolved `forge_home`):
//! - `<home>/rag/meta`: meta store, present once `.lance` exists inside it
//! - `<home>/rag/bin/rag-engine`: default engine bridge program

use std::path::{Path, PathBuf};

use forge_core::StoreScope;

const KNOWLEDGE_DIR: &str = ".rag";
const THROTTLE_MARKER: &str = ".last-query";
const SESSION_LOG: &str = "session-log.md";
const SESSION_CONTEXT: &[&str] = &[".claude", "session-context.md"];

const RAG_DIR: &str = "rag";
const META_DIR: &str = "meta";
const META_INDEX_ARTIFACT: &str = ".lance";
const ENGINE_PROGRAM: &[&str] = &["bin", "rag-engine"];

/// Paths under one project directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.rag`.
    #[must_use]
    pub fn knowledge_dir(&self) -> PathBuf {
        self.root.join(KNOWLEDGE_DIR)
    }

    /// Whether the project opted in to knowledge capture.
    #[must_use]
    pub fn has_knowledge_dir(&self) -> bool {
        self.knowledge_dir().exists()
    }

    /// `<root>/.rag/.last-query`.
    #[must_use]
    pub fn throttle_marker(&self) -> PathBuf {
        self.knowledge_dir().join(THROTTLE_MARKER)
    }

    /// `<root>/.rag/session-log.md`.
    #[must_use]
    pub fn session_log(&self) -> PathBuf {
        self.knowledge_dir().join(SESSION_LOG)
    }

    /// `<root>/.claude/session-context.md`.
    #[must_use]
    pub fn session_context(&self) -> PathBuf {
        SESSION_CONTEXT
            .iter()
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    /// Project store scope.
    #[must_use]
    pub fn scope(&self) -> StoreScope {
        StoreScope::project(self.root.clone())
    }
}

/// Paths under one installation root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallLayout {
    forge_home: PathBuf,
}

impl InstallLayout {
    /// Layout rooted at `forge_home`.
    pub fn new(forge_home: impl Into<PathBuf>) -> Self {
        Self {
            forge_home: forge_home.into(),
        }
    }

    /// Installation root.
    #[must_use]
    pub fn forge_home(&self) -> &Path {
        &self.forge_home
    }

    /// `<home>/rag/meta`.
    #[must_use]
    pub fn meta_store(&self) -> PathBuf {
        self.forge_home.join(RAG_DIR).join(META_DIR)
    }

    /// Whether the meta store has been persisted at least once.
    #[must_use]
    pub fn has_meta_store(&self) -> bool {
        let meta = self.meta_store();
        meta.exists() && meta.join(META_INDEX_ARTIFACT).exists()
    }

    /// Meta store scope.
    #[must_use]
    pub fn meta_scope(&self) -> StoreScope {
        StoreScope::meta(self.meta_store())
    }

    /// `<home>/rag/bin/rag-engine`.
    #[must_use]
    pub fn default_engine_program(&self) -> PathBuf {
        ENGINE_PROGRAM
            .iter()
            .fold(self.forge_home.join(RAG_DIR), |path, part| path.join(part))
    }
}
