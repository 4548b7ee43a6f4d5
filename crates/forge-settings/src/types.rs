//! Settings type definitions.

use std::path::PathBuf;

use crate::layout::InstallLayout;

/// Contents of `~/.forge-device.yaml`.
///
/// Only `forge_home` is recognised; any other line in the file is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Installation root.
    pub forge_home: Option<PathBuf>,
}

/// Resolved settings for one hook invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookSettings {
    /// Installation root. `None` means every hook is a no-op.
    pub forge_home: Option<PathBuf>,
    /// Fallback `tracing` filter when `FORGE_RAG_LOG` is unset.
    pub log_level: String,
    /// Engine program override. Defaults to `<forge_home>/rag/bin/rag-engine`.
    pub engine_program: Option<PathBuf>,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            forge_home: None,
            log_level: "warn".to_string(),
            engine_program: None,
        }
    }
}

impl HookSettings {
    /// Installation layout, if the root was resolved.
    #[must_use]
    pub fn install_layout(&self) -> Option<InstallLayout> {
        self.forge_home.as_ref().map(InstallLayout::new)
    }

    /// Program implementing the engine bridge.
    #[must_use]
    pub fn engine_program(&self) -> Option<PathBuf> {
        self.engine_program.clone().or_else(|| {
            self.install_layout()
                .map(|install| install.default_engine_program())
        })
    }
}
