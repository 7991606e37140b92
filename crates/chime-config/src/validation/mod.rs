//! Full configuration validation.
//!
//! Each domain has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod bridge;
mod helpers;
mod sounds;


use crate::schema::ChimeConfig;
use chime_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ChimeConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sounds::validate_sounds(&mut errors, config);
    bridge::validate_bridge(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
