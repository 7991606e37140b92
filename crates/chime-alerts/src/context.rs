//! Read-only inputs to the alert decision.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use chime_common::{ConversationKey, UserStatus};
use chime_config::{ChimeConfig, NotificationSettings};
use tokio::sync::watch;

/// The slice of application state alerting depends on.
///
/// Implementations are owned elsewhere; alerting only reads.
pub trait AlertContext: Send + Sync {
    fn settings(&self) -> NotificationSettings;
    fn own_status(&self) -> UserStatus;
    fn selected_conversation(&self) -> Option<ConversationKey>;
}

/// Whether the host application is currently backgrounded.
///
/// Written only by lifecycle callbacks, read by the policy.
#[derive(Debug, Default)]
pub struct BackgroundState {
    background: AtomicBool,
}

impl BackgroundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_background(&self) -> bool {
        self.background.load(Ordering::Acquire)
    }

    /// Returns the previous value.
    pub fn set_in_background(&self, background: bool) -> bool {
        self.background.swap(background, Ordering::AcqRel)
    }
}

/// Session state as seen by alerting: live settings plus what the UI
/// reports about status and selection.
pub struct SessionState {
    settings: watch::Receiver<ChimeConfig>,
    status: RwLock<UserStatus>,
    selected: RwLock<Option<ConversationKey>>,
}

impl SessionState {
    pub fn new(settings: watch::Receiver<ChimeConfig>) -> Self {
        Self {
            settings,
            status: RwLock::new(UserStatus::default()),
            selected: RwLock::new(None),
        }
    }

    pub fn set_status(&self, status: UserStatus) {
        match self.status.write() {
            Ok(mut s) => *s = status,
            Err(poisoned) => *poisoned.into_inner() = status,
        }
    }

    pub fn select(&self, key: Option<ConversationKey>) {
        match self.selected.write() {
            Ok(mut s) => *s = key,
            Err(poisoned) => *poisoned.into_inner() = key,
        }
    }
}

impl AlertContext for SessionState {
    fn settings(&self) -> NotificationSettings {
        self.settings.borrow().notifications.clone()
    }

    fn own_status(&self) -> UserStatus {
        match self.status.read() {
            Ok(s) => *s,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn selected_conversation(&self) -> Option<ConversationKey> {
        match self.selected.read() {
            Ok(s) => s.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
