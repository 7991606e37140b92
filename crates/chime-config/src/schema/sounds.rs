//! Audio cue configuration.

use serde::{Deserialize, Serialize};

/// One encoded variant of every cue: `{asset_dir}/{name}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    pub mime: String,
    pub extension: String,
}

impl CodecConfig {
    pub fn new(mime: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            extension: extension.into(),
        }
    }
}

/// Audio cue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Directory (relative to the bridge assets) holding the cue files.
    pub asset_dir: String,
    /// Cues warmed up at startup.
    pub preload: Vec<String>,
    /// Codec variants, in order of preference.
    pub codecs: Vec<CodecConfig>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            asset_dir: "sounds".into(),
            preload: ["attention", "chat", "login", "logout", "modalert", "newnote", "system"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            codecs: vec![
                CodecConfig::new("audio/mpeg", "mp3"),
                CodecConfig::new("audio/wav", "wav"),
                CodecConfig::new("audio/ogg", "ogg"),
            ],
        }
    }
}
