//! Audio cues played by `<audio>` elements inside the page.
//!
//! Elements are created and driven by queued scripts; the page reports
//! each play attempt back over IPC (`audio_result`), which resolves the
//! waiting [`AudioElement::play`] future.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chime_alerts::{AudioBackend, AudioElement, AudioSource};
use chime_common::PlatformError;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::script;

/// How long a play attempt may go unanswered before it counts as rejected.
pub const PLAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Scripts waiting to be evaluated on the UI thread.
#[derive(Clone, Default)]
pub struct ScriptQueue {
    scripts: Arc<Mutex<Vec<String>>>,
}

impl ScriptQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, script: String) {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(script);
    }

    /// Take every queued script, oldest first.
    pub fn drain(&self) -> Vec<String> {
        let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *scripts)
    }

    pub fn len(&self) -> usize {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Payload of an `audio_result` IPC message.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayResult {
    pub id: u64,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

type Waiter = oneshot::Sender<Result<(), String>>;

#[derive(Default)]
struct PendingPlays {
    next: AtomicU64,
    waiting: Mutex<HashMap<u64, Waiter>>,
}

impl PendingPlays {
    fn register(&self) -> (u64, oneshot::Receiver<Result<(), String>>) {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = oneshot::channel();
        self.waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, tx);
        (id, rx)
    }

    fn clear(&self) -> usize {
        let mut waiting = self.waiting.lock().unwrap_or_else(PoisonError::into_inner);
        let count = waiting.len();
        waiting.clear();
        count
    }

    fn take(&self, id: u64) -> Option<Waiter> {
        self.waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }
}

/// [`AudioBackend`] whose elements live in the page.
#[derive(Clone)]
pub struct ScriptAudioBackend {
    scripts: ScriptQueue,
    pending: Arc<PendingPlays>,
}

impl ScriptAudioBackend {
    pub fn new(scripts: ScriptQueue) -> Self {
        Self {
            scripts,
            pending: Arc::new(PendingPlays::default()),
        }
    }

    /// Fail every unanswered play attempt; the page that would have
    /// answered is gone. Returns how many were waiting.
    pub fn abandon_pending(&self) -> usize {
        let count = self.pending.clear();
        if count > 0 {
            debug!(count, "abandoned audio plays of the previous page");
        }
        count
    }

    /// Settle the play attempt the page reported on. Returns `false` for
    /// an unknown or already settled id.
    pub fn resolve(&self, result: PlayResult) -> bool {
        let Some(waiter) = self.pending.take(result.id) else {
            debug!(id = result.id, "stale audio result");
            return false;
        };
        let outcome = if result.ok {
            Ok(())
        } else {
            Err(result.error.unwrap_or_else(|| "playback failed".into()))
        };
        let _ = waiter.send(outcome);
        true
    }
}

impl AudioBackend for ScriptAudioBackend {
    fn create_element(
        &self,
        name: &str,
        sources: &[AudioSource],
    ) -> Result<Arc<dyn AudioElement>, PlatformError> {
        if sources.is_empty() {
            return Err(PlatformError::AudioError(format!("no sources for {name}")));
        }
        self.scripts.push(script::audio_create(name, sources));
        Ok(Arc::new(ScriptAudioElement {
            name: name.to_string(),
            scripts: self.scripts.clone(),
            pending: Arc::clone(&self.pending),
        }))
    }
}

struct ScriptAudioElement {
    name: String,
    scripts: ScriptQueue,
    pending: Arc<PendingPlays>,
}

#[async_trait]
impl AudioElement for ScriptAudioElement {
    fn set_volume(&self, volume: f32) {
        self.scripts
            .push(script::audio_set(&self.name, &json!({ "volume": volume })));
    }

    fn set_muted(&self, muted: bool) {
        self.scripts
            .push(script::audio_set(&self.name, &json!({ "muted": muted })));
    }

    async fn play(&self) -> Result<(), PlatformError> {
        let (id, rx) = self.pending.register();
        self.scripts.push(script::audio_play(&self.name, id));

        match tokio::time::timeout(PLAY_TIMEOUT, rx).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(PlatformError::PlaybackRejected(e)),
            Ok(Err(_)) => Err(PlatformError::PlaybackRejected("page went away".into())),
            Err(_) => {
                self.pending.take(id);
                warn!(cue = %self.name, "audio play timed out");
                Err(PlatformError::PlaybackRejected(format!(
                    "no answer within {}s",
                    PLAY_TIMEOUT.as_secs()
                )))
            }
        }
    }
}
