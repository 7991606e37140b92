use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chime_common::PlatformError;
use chime_config::SoundConfig;
use futures_util::future::{join_all, BoxFuture};
use futures_util::FutureExt;
use tracing::{debug, info, warn};

use crate::context::AlertContext;

use super::{cue_sources, AudioBackend, AudioElement};

type Warmup = BoxFuture<'static, (String, Result<(), PlatformError>)>;

#[derive(Default)]
struct Cues {
    elements: HashMap<String, Arc<dyn AudioElement>>,
    /// Cues the backend could not create. Playing them is a silent no-op.
    unavailable: HashSet<String>,
}

/// Exactly one playable element per cue name.
pub struct AudioCuePool {
    backend: Arc<dyn AudioBackend>,
    context: Arc<dyn AlertContext>,
    sounds: SoundConfig,
    cues: Mutex<Cues>,
}

impl AudioCuePool {
    pub fn new(
        backend: Arc<dyn AudioBackend>,
        context: Arc<dyn AlertContext>,
        sounds: SoundConfig,
    ) -> Self {
        Self {
            backend,
            context,
            sounds,
            cues: Mutex::new(Cues::default()),
        }
    }

    fn cues(&self) -> MutexGuard<'_, Cues> {
        self.cues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create and warm an element for every name not loaded yet.
    ///
    /// Elements start muted at zero volume and are played once so that
    /// autoplay-gated runtimes unlock them. Warm-ups run concurrently;
    /// a failure is logged and does not affect the other cues.
    pub async fn preload<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut warmups = Vec::new();
        {
            let mut cues = self.cues();
            for name in names {
                let name = name.as_ref();
                if cues.elements.contains_key(name) {
                    debug!(cue = name, "audio cue already preloaded");
                    continue;
                }
                warmups.extend(self.load(&mut cues, name));
            }
        }
        warm(warmups).await;
    }

    /// Recreate every known cue after the backend lost its elements, as
    /// when the page holding them navigates. Cues stay known throughout.
    pub async fn reload(&self) {
        let mut warmups = Vec::new();
        {
            let mut guard = self.cues();
            let cues = &mut *guard;
            let mut names: Vec<String> = cues
                .elements
                .drain()
                .map(|(name, _)| name)
                .chain(cues.unavailable.drain())
                .collect();
            names.sort();
            debug!(cues = names.len(), "reloading audio cues");
            for name in &names {
                warmups.extend(self.load(cues, name));
            }
        }
        warm(warmups).await;
    }

    /// Create the element for `name`. Returns its warm-up, or `None` when
    /// the backend could not create it.
    fn load(&self, cues: &mut Cues, name: &str) -> Option<Warmup> {
        let sources = cue_sources(name, &self.sounds);
        let element = match self.backend.create_element(name, &sources) {
            Ok(element) => element,
            Err(e) => {
                warn!(cue = name, error = %e, "audio cue unavailable");
                cues.unavailable.insert(name.to_string());
                return None;
            }
        };
        cues.unavailable.remove(name);

        element.set_volume(0.0);
        element.set_muted(true);
        cues.elements.insert(name.to_string(), Arc::clone(&element));

        let name = name.to_string();
        Some(async move { (name, element.play().await) }.boxed())
    }

    /// Play a preloaded cue at full volume. Fire-and-forget.
    ///
    /// No-op when sound is disabled in settings. Playback rejection is
    /// logged, never returned. Must be called within a tokio runtime.
    ///
    /// # Panics
    ///
    /// If `name` was never passed to [`preload`](Self::preload).
    pub fn play(&self, name: &str) {
        if !self.context.settings().play_sound {
            return;
        }

        let element = {
            let cues = self.cues();
            match cues.elements.get(name) {
                Some(element) => Arc::clone(element),
                None if cues.unavailable.contains(name) => {
                    debug!(cue = name, "audio cue unavailable, skipping");
                    return;
                }
                None => panic!("audio cue {name:?} played before it was preloaded"),
            }
        };

        element.set_volume(1.0);
        element.set_muted(false);

        let name = name.to_string();
        tokio::spawn(async move {
            if let Err(e) = element.play().await {
                warn!(cue = %name, error = %e, "audio cue playback rejected");
            }
        });
    }

    pub fn is_preloaded(&self, name: &str) -> bool {
        self.cues().elements.contains_key(name)
    }

    /// Whether `name` went through [`preload`](Self::preload), including
    /// cues that turned out unavailable. Only known cues may be played.
    pub fn is_known(&self, name: &str) -> bool {
        let cues = self.cues();
        cues.elements.contains_key(name) || cues.unavailable.contains(name)
    }

    pub fn len(&self) -> usize {
        self.cues().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

async fn warm(warmups: Vec<Warmup>) {
    let total = warmups.len();
    let mut failed = 0;
    for (name, result) in join_all(warmups).await {
        if let Err(e) = result {
            failed += 1;
            warn!(cue = %name, error = %e, "audio cue warm-up failed");
        }
    }
    if total > 0 {
        info!(loaded = total, failed, "audio cues preloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{session, settle, FakeAudioBackend};

    fn pool(backend: &Arc<FakeAudioBackend>) -> AudioCuePool {
        let (_tx, context) = session();
        AudioCuePool::new(backend.clone(), context, SoundConfig::default())
    }

    #[tokio::test]
    async fn preload_is_idempotent() {
        let backend = Arc::new(FakeAudioBackend::default());
        let pool = pool(&backend);

        pool.preload(["chat", "chat"]).await;
        pool.preload(["chat"]).await;

        assert_eq!(pool.len(), 1);
        assert_eq!(backend.created(), vec!["chat".to_string()]);
        assert_eq!(backend.element("chat").plays(), 1);
    }

    #[tokio::test]
    async fn preload_warms_muted_at_zero_volume() {
        let backend = Arc::new(FakeAudioBackend::default());
        let pool = pool(&backend);

        pool.preload(["login"]).await;

        let element = backend.element("login");
        assert!(element.muted());
        assert_eq!(element.volume(), 0.0);
        assert_eq!(element.plays(), 1);
        assert_eq!(element.sources().len(), 3);
    }

    #[tokio::test]
    async fn one_failed_warmup_does_not_stop_the_rest() {
        let backend = Arc::new(FakeAudioBackend::default().rejecting("attention"));
        let pool = pool(&backend);

        pool.preload(["attention", "chat", "system"]).await;

        assert_eq!(pool.len(), 3);
        for name in ["attention", "chat", "system"] {
            assert_eq!(backend.element(name).plays(), 1, "{name} should be warmed");
        }
    }

    #[tokio::test]
    async fn play_unmutes_at_full_volume() {
        let backend = Arc::new(FakeAudioBackend::default());
        let pool = pool(&backend);
        pool.preload(["chat"]).await;

        pool.play("chat");
        settle().await;

        let element = backend.element("chat");
        assert!(!element.muted());
        assert_eq!(element.volume(), 1.0);
        assert_eq!(element.plays(), 2);
    }

    #[tokio::test]
    async fn play_respects_sound_setting() {
        let backend = Arc::new(FakeAudioBackend::default());
        let (tx, context) = session();
        let pool = AudioCuePool::new(backend.clone(), context, SoundConfig::default());
        pool.preload(["chat"]).await;

        tx.send_modify(|c| c.notifications.play_sound = false);
        pool.play("chat");
        settle().await;

        assert_eq!(backend.element("chat").plays(), 1);
        assert!(backend.element("chat").muted());
    }

    #[tokio::test]
    async fn rejected_playback_is_swallowed() {
        let backend = Arc::new(FakeAudioBackend::default().rejecting("chat"));
        let pool = pool(&backend);
        pool.preload(["chat"]).await;

        pool.play("chat");
        settle().await;

        assert_eq!(backend.element("chat").plays(), 2);
    }

    #[tokio::test]
    async fn unavailable_cue_is_skipped_quietly() {
        let backend = Arc::new(FakeAudioBackend::default().unavailable("newnote"));
        let pool = pool(&backend);
        pool.preload(["newnote"]).await;

        assert!(!pool.is_preloaded("newnote"));
        assert!(pool.is_known("newnote"));
        assert!(!pool.is_known("chat"));
        pool.play("newnote");
    }

    #[tokio::test]
    #[should_panic(expected = "played before it was preloaded")]
    async fn playing_unknown_cue_panics() {
        let backend = Arc::new(FakeAudioBackend::default());
        let pool = pool(&backend);
        pool.play("modalert");
    }

    #[tokio::test]
    async fn reload_recreates_every_known_cue() {
        let backend = Arc::new(FakeAudioBackend::default().unavailable("newnote"));
        let pool = pool(&backend);
        pool.preload(["chat", "login", "newnote"]).await;
        assert_eq!(backend.created().len(), 2);

        pool.reload().await;

        let mut created = backend.created();
        created.sort();
        assert_eq!(created, ["chat", "chat", "login", "login"]);
        assert_eq!(pool.len(), 2);
        assert!(pool.is_known("newnote"));

        pool.preload(["chat"]).await;
        assert_eq!(backend.created().len(), 4);
    }
}
