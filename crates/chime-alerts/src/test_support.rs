//! In-memory fakes for the seam traits.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chime_common::{ConversationKey, PlatformError};
use chime_config::ChimeConfig;
use tokio::sync::watch;

use crate::audio::{AudioBackend, AudioElement, AudioSource};
use crate::context::SessionState;
use crate::conversation::{Conversation, HostWindow};
use crate::notifier::{
    NotificationData, NotificationOptions, NotificationPresenter, NotificationRecord, Permission,
};

pub fn session() -> (watch::Sender<ChimeConfig>, Arc<SessionState>) {
    let (tx, rx) = watch::channel(ChimeConfig::default());
    (tx, Arc::new(SessionState::new(rx)))
}

/// Let spawned tasks run to completion.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

pub fn options(key: &str) -> NotificationOptions {
    NotificationOptions {
        body: "body".into(),
        icon: None,
        badge: "ic_notification.png".into(),
        silent: true,
        tag: key.into(),
        renotify: true,
        data: NotificationData { key: key.into() },
    }
}

// -- audio --

pub struct FakeElement {
    sources: Vec<AudioSource>,
    reject: bool,
    volume: Mutex<f32>,
    muted: AtomicBool,
    plays: AtomicUsize,
}

impl FakeElement {
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub fn volume(&self) -> f32 {
        *self.volume.lock().unwrap()
    }

    pub fn sources(&self) -> &[AudioSource] {
        &self.sources
    }
}

#[async_trait]
impl AudioElement for FakeElement {
    fn set_volume(&self, volume: f32) {
        *self.volume.lock().unwrap() = volume;
    }

    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    async fn play(&self) -> Result<(), PlatformError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            Err(PlatformError::PlaybackRejected("not allowed".into()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct FakeAudioBackend {
    rejecting: HashSet<String>,
    unavailable: HashSet<String>,
    created: Mutex<Vec<String>>,
    elements: Mutex<HashMap<String, Arc<FakeElement>>>,
}

impl FakeAudioBackend {
    /// Elements for `name` reject every `play`.
    pub fn rejecting(mut self, name: &str) -> Self {
        self.rejecting.insert(name.to_string());
        self
    }

    /// `name` cannot be created at all.
    pub fn unavailable(mut self, name: &str) -> Self {
        self.unavailable.insert(name.to_string());
        self
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn element(&self, name: &str) -> Arc<FakeElement> {
        self.elements
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("no element created for {name}"))
    }
}

impl AudioBackend for FakeAudioBackend {
    fn create_element(
        &self,
        name: &str,
        sources: &[AudioSource],
    ) -> Result<Arc<dyn AudioElement>, PlatformError> {
        if self.unavailable.contains(name) {
            return Err(PlatformError::AudioError(format!("{name} missing")));
        }
        let element = Arc::new(FakeElement {
            sources: sources.to_vec(),
            reject: self.rejecting.contains(name),
            volume: Mutex::new(1.0),
            muted: AtomicBool::new(false),
            plays: AtomicUsize::new(0),
        });
        self.created.lock().unwrap().push(name.to_string());
        self.elements
            .lock()
            .unwrap()
            .insert(name.to_string(), element.clone());
        Ok(element)
    }
}

// -- notifications --

pub struct RecordingPresenter {
    permission: Permission,
    on_request: Permission,
    available: bool,
    fail: bool,
    closable: bool,
    presented: Mutex<Vec<(String, NotificationOptions)>>,
    withdrawn: Mutex<Vec<ConversationKey>>,
}

impl RecordingPresenter {
    fn with_permission(permission: Permission) -> Self {
        Self {
            permission,
            on_request: permission,
            available: true,
            fail: false,
            closable: true,
            presented: Mutex::new(Vec::new()),
            withdrawn: Mutex::new(Vec::new()),
        }
    }

    pub fn granted() -> Self {
        Self::with_permission(Permission::Granted)
    }

    pub fn denied() -> Self {
        Self::with_permission(Permission::Denied)
    }

    /// Not asked yet; granted once requested.
    pub fn asking() -> Self {
        Self {
            on_request: Permission::Granted,
            ..Self::with_permission(Permission::Default)
        }
    }

    /// Stands for a platform without notifications; never handed to a center.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::granted()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::granted()
        }
    }

    pub fn without_close(mut self) -> Self {
        self.closable = false;
        self
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn presented(&self) -> Vec<(String, NotificationOptions)> {
        self.presented.lock().unwrap().clone()
    }

    pub fn withdrawn(&self) -> Vec<ConversationKey> {
        self.withdrawn.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationPresenter for RecordingPresenter {
    fn permission(&self) -> Permission {
        self.permission
    }

    async fn request_permission(&self) -> Permission {
        self.on_request
    }

    fn present(&self, record: &Arc<NotificationRecord>) -> Result<(), PlatformError> {
        if self.fail {
            return Err(PlatformError::NotificationError("daemon gone".into()));
        }
        self.presented
            .lock()
            .unwrap()
            .push((record.title().to_string(), record.options().clone()));
        Ok(())
    }

    fn withdraw(&self, record: &NotificationRecord) {
        self.withdrawn.lock().unwrap().push(record.tag().clone());
    }

    fn supports_close(&self) -> bool {
        self.closable
    }
}

// -- host --

#[derive(Default)]
pub struct FakeWindow {
    focuses: AtomicUsize,
}

impl FakeWindow {
    pub fn focuses(&self) -> usize {
        self.focuses.load(Ordering::SeqCst)
    }
}

impl HostWindow for FakeWindow {
    fn focus(&self) {
        self.focuses.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeConversation {
    key: ConversationKey,
    shows: AtomicUsize,
}

impl FakeConversation {
    pub fn new(key: &str) -> Arc<Self> {
        Arc::new(Self {
            key: key.into(),
            shows: AtomicUsize::new(0),
        })
    }

    pub fn shows(&self) -> usize {
        self.shows.load(Ordering::SeqCst)
    }
}

impl Conversation for FakeConversation {
    fn key(&self) -> &ConversationKey {
        &self.key
    }

    fn show(&self) {
        self.shows.fetch_add(1, Ordering::SeqCst);
    }
}
