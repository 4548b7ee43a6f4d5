//! Settings loading with device-file fallback and environment overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`HookSettings::default()`]
//! 2. If `~/.forge-device.yaml` exists, take `forge_home` from it
//! 3. Apply environment variable overrides (highest priority)
//!
//! The device file is scanned line by line for the one recognised key; other
//! lines are never parsed, so unrelated content cannot hide `forge_home`.
//! A device file that cannot be read is logged and treated as absent.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{DeviceConfig, HookSettings};

/// Device file name, relative to the user's home directory.
pub const DEVICE_CONFIG_FILE: &str = ".forge-device.yaml";

/// Line prefix carrying the installation root in the device file.
const FORGE_HOME_KEY: &str = "forge_home:";

/// Installation root override.
pub const ENV_FORGE_HOME: &str = "FORGE_HOME";
/// Fallback log level override.
pub const ENV_LOG_LEVEL: &str = "FORGE_RAG_LOG_LEVEL";
/// Engine program override.
pub const ENV_ENGINE: &str = "FORGE_RAG_ENGINE";

/// Resolve `~/.forge-device.yaml`. `None` when `HOME` is unset.
pub fn device_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").filter(|h| !h.is_empty())?;
    Some(PathBuf::from(home).join(DEVICE_CONFIG_FILE))
}

/// Load settings from the default device file with env var overrides.
pub fn load_settings() -> HookSettings {
    let mut settings = load_settings_from_path(device_config_path().as_deref());
    apply_env_overrides(&mut settings);
    settings
}

/// Load settings from a specific device file, without env overrides.
///
/// Missing file → defaults. Unreadable file → defaults, with a warning.
pub fn load_settings_from_path(path: Option<&Path>) -> HookSettings {
    let mut settings = HookSettings::default();
    let Some(path) = path else {
        return settings;
    };

    match read_device_config(path) {
        Ok(device) => {
            debug!(?path, has_forge_home = device.forge_home.is_some(), "loaded device config");
            settings.forge_home = device.forge_home.filter(|p| !p.as_os_str().is_empty());
        }
        Err(e) => {
            warn!(?path, error = %e, "ignoring unreadable device config");
        }
    }
    settings
}

/// Read a device file. A missing file yields an empty config.
pub fn read_device_config(path: &Path) -> Result<DeviceConfig> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(parse_device_config(&String::from_utf8_lossy(&bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DeviceConfig::default()),
        Err(e) => Err(e.into()),
    }
}

/// Extract the recognised key from device file text. The last `forge_home:`
/// line wins; its value is trimmed and an empty value counts as unset.
pub fn parse_device_config(content: &str) -> DeviceConfig {
    let forge_home = content
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(FORGE_HOME_KEY))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    DeviceConfig { forge_home }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut HookSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary lookup. Empty values are ignored.
pub fn apply_overrides<F>(settings: &mut HookSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = read(ENV_FORGE_HOME) {
        settings.forge_home = Some(PathBuf::from(v));
    }
    if let Some(v) = read(ENV_LOG_LEVEL) {
        settings.log_level = v;
    }
    if let Some(v) = read(ENV_ENGINE) {
        settings.engine_program = Some(PathBuf::from(v));
    }
}
