//! Reading the config file, and writing the documented default.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chime_common::ConfigError;
use tracing::{info, warn};

use super::template::default_config_toml;
use crate::schema::ChimeConfig;
use crate::validation;

/// `<platform config dir>/chime/config.toml`.
///
/// Linux: `~/.config/chime/config.toml`; macOS:
/// `~/Library/Application Support/chime/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("chime").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Parse the TOML file at `path`. Absent keys take their defaults.
///
/// Validation problems are only logged here; callers that must reject an
/// invalid file run [`validation::validate`] themselves.
pub fn load_from_path(path: &Path) -> Result<ChimeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("failed to read {}: {e}", path.display())),
    })?;

    let config: ChimeConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "loaded config has invalid values: {e}");
    }
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Write the commented default config to `path`, creating parent dirs.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config_toml())
    };
    write().map_err(|e| {
        ConfigError::ParseError(format!("cannot write default config {}: {e}", path.display()))
    })?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}
