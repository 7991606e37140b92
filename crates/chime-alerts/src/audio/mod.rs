//! Audio cues: named sounds preloaded once and played on demand.

mod pool;

pub use pool::AudioCuePool;

use std::sync::Arc;

use async_trait::async_trait;
use chime_common::PlatformError;
use chime_config::SoundConfig;
use serde::Serialize;

/// One encoded variant of a cue. The runtime plays the first it can decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioSource {
    pub mime: String,
    pub src: String,
}

/// Sources for `name`, one per configured codec, in preference order.
pub fn cue_sources(name: &str, sounds: &SoundConfig) -> Vec<AudioSource> {
    let dir = sounds.asset_dir.trim_end_matches('/');
    sounds
        .codecs
        .iter()
        .map(|codec| AudioSource {
            mime: codec.mime.clone(),
            src: if dir.is_empty() {
                format!("{name}.{}", codec.extension)
            } else {
                format!("{dir}/{name}.{}", codec.extension)
            },
        })
        .collect()
}

/// Creates playable elements. Implemented by whatever owns audio output.
pub trait AudioBackend: Send + Sync {
    fn create_element(
        &self,
        name: &str,
        sources: &[AudioSource],
    ) -> Result<Arc<dyn AudioElement>, PlatformError>;
}

/// A single loaded cue.
#[async_trait]
pub trait AudioElement: Send + Sync {
    fn set_volume(&self, volume: f32);
    fn set_muted(&self, muted: bool);

    /// Start playback. Resolves once the runtime accepts or rejects it.
    async fn play(&self) -> Result<(), PlatformError>;
}
