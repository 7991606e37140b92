//! Audio cue validation: cue names and codec table.

use std::collections::HashSet;

use regex::Regex;
use tracing::warn;

use crate::schema::ChimeConfig;

use super::helpers::validate_not_blank;

/// Cue names end up in element ids and file names.
const CUE_NAME_PATTERN: &str = r"^[A-Za-z0-9_-]+$";

/// Fewer codecs than this still work, but some runtimes will find nothing they decode.
const RECOMMENDED_CODECS: usize = 3;

pub(crate) fn validate_sounds(errors: &mut Vec<String>, config: &ChimeConfig) {
    let sounds = &config.sounds;

    validate_not_blank(errors, "sounds.asset_dir", &sounds.asset_dir);

    if let Ok(pattern) = Regex::new(CUE_NAME_PATTERN) {
        for name in &sounds.preload {
            if !pattern.is_match(name) {
                errors.push(format!("sounds.preload: invalid cue name {name:?}"));
            }
        }
    }

    if sounds.codecs.is_empty() {
        errors.push("sounds.codecs must list at least one codec".into());
        return;
    }
    if sounds.codecs.len() < RECOMMENDED_CODECS {
        warn!(
            codecs = sounds.codecs.len(),
            "fewer than {RECOMMENDED_CODECS} audio codecs configured"
        );
    }

    let mut seen = HashSet::new();
    for codec in &sounds.codecs {
        if !codec.mime.starts_with("audio/") {
            errors.push(format!("sounds.codecs: {:?} is not an audio MIME type", codec.mime));
        }
        validate_not_blank(errors, "sounds.codecs.extension", &codec.extension);
        if !seen.insert(codec.extension.to_ascii_lowercase()) {
            errors.push(format!("sounds.codecs: duplicate extension {:?}", codec.extension));
        }
    }
}
