//! Configuration schema types for Chime.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod notifications;
mod sounds;
mod system;

pub use bridge::*;
pub use notifications::*;
pub use sounds::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChimeConfig {
    pub notifications: NotificationSettings,
    pub sounds: SoundConfig,
    pub bridge: BridgeConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ChimeConfig::default();
        assert!(config.notifications.enabled);
        assert!(config.notifications.play_sound);
        assert!(config.notifications.show_avatars);
        assert!(!config.notifications.always_notify);
        assert_eq!(config.sounds.codecs.len(), 3);
        assert_eq!(config.bridge.backlog_limit, 100);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: ChimeConfig = toml::from_str(
            r#"
[notifications]
always_notify = true
"#,
        )
        .unwrap();
        assert!(config.notifications.always_notify);
        assert!(config.notifications.play_sound);
        assert_eq!(config.sounds, SoundConfig::default());
    }

    #[test]
    fn log_level_parses_uppercase() {
        let config: ChimeConfig = toml::from_str("[logging]\nlevel = \"DEBUG\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.level.directive(), "chime=debug");
    }

    #[test]
    fn codecs_parse_from_inline_tables() {
        let config: ChimeConfig = toml::from_str(
            r#"
[sounds]
codecs = [{ mime = "audio/ogg", extension = "ogg" }]
"#,
        )
        .unwrap();
        assert_eq!(config.sounds.codecs, vec![CodecConfig::new("audio/ogg", "ogg")]);
        assert_eq!(config.sounds.asset_dir, "sounds");
    }
}
