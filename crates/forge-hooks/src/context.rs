//! Per-invocation environment shared by every hook.

use std::path::PathBuf;

use forge_settings::{HookSettings, InstallLayout, ProjectLayout};

use crate::types::SkipReason;

/// Where a hook runs: the project it was fired in and the resolved
/// installation, if any.
#[derive(Clone, Debug)]
pub struct HookEnv {
    project: ProjectLayout,
    install: Option<InstallLayout>,
}

impl HookEnv {
    /// Build from explicit layouts.
    #[must_use]
    pub fn new(project: ProjectLayout, install: Option<InstallLayout>) -> Self {
        Self { project, install }
    }

    /// Build for `project_dir` with the installation resolved from settings.
    pub fn from_settings(project_dir: impl Into<PathBuf>, settings: &HookSettings) -> Self {
        Self::new(ProjectLayout::new(project_dir), settings.install_layout())
    }

    /// Project layout.
    #[must_use]
    pub fn project(&self) -> &ProjectLayout {
        &self.project
    }

    /// Installation layout, if the root resolved.
    #[must_use]
    pub fn install(&self) -> Option<&InstallLayout> {
        self.install.as_ref()
    }

    /// Check the two preconditions every hook shares and return the
    /// installation on success.
    pub fn require_active(&self) -> Result<&InstallLayout, SkipReason> {
        if !self.project.has_knowledge_dir() {
            return Err(SkipReason::NoKnowledgeDir);
        }
        self.install.as_ref().ok_or(SkipReason::NoInstallRoot)
    }
}
