//! # forge-settings
//!
//! Installation-root resolution and layered settings for the forge RAG hooks.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`HookSettings::default()`]
//! 2. **Device file**: `~/.forge-device.yaml`, one recognised key:
//!    `forge_home: <path>`
//! 3. **Environment variables**: `FORGE_HOME`, `FORGE_RAG_LOG_LEVEL`,
//!    `FORGE_RAG_ENGINE` (highest priority)
//!
//! Settings are loaded once per hook invocation and passed explicitly; there
//! is no global instance.
//!
//! # Usage
//!
//! ```no_run
//! use forge_settings::load_settings;
//!
//! let settings = load_settings();
//! if let Some(install) = settings.install_layout() {
//!     println!("meta store: {}", install.meta_store().display());
//! }
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod layout;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use layout::{InstallLayout, ProjectLayout};
pub use loader::{
    apply_env_overrides, apply_overrides, device_config_path, load_settings,
    load_settings_from_path, parse_device_config, read_device_config,
};
pub use types::{DeviceConfig, HookSettings};
