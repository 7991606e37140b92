//! Turns an incoming conversation event into alerts.

use std::sync::Arc;
use std::time::Duration;

use chime_common::ConversationKey;
use chime_config::NotificationSettings;
use tracing::{debug, warn};

use crate::audio::AudioCuePool;
use crate::context::{AlertContext, BackgroundState};
use crate::conversation::{Conversation, HostWindow};
use crate::notifier::{NotificationCenter, NotificationData, NotificationOptions, Permission};
use crate::policy;

/// Notifications are retired this long after being shown. Closable ones
/// are also withdrawn from view; the rest expire on the OS side.
pub const AUTO_CLOSE_AFTER: Duration = Duration::from_millis(5000);

pub struct NotificationDispatcher {
    context: Arc<dyn AlertContext>,
    background: Arc<BackgroundState>,
    audio: Arc<AudioCuePool>,
    /// `None` when the platform has no notification capability.
    notifier: Option<Arc<NotificationCenter>>,
    window: Arc<dyn HostWindow>,
}

impl NotificationDispatcher {
    pub fn new(
        context: Arc<dyn AlertContext>,
        background: Arc<BackgroundState>,
        audio: Arc<AudioCuePool>,
        window: Arc<dyn HostWindow>,
    ) -> Self {
        Self {
            context,
            background,
            audio,
            notifier: None,
            window,
        }
    }

    pub fn with_notifier(mut self, center: Arc<NotificationCenter>) -> Self {
        self.notifier = Some(center);
        self
    }

    pub fn audio(&self) -> &Arc<AudioCuePool> {
        &self.audio
    }

    pub fn notifier(&self) -> Option<&Arc<NotificationCenter>> {
        self.notifier.as_ref()
    }

    pub fn should_notify(&self, conversation: &dyn Conversation) -> bool {
        let selected = self.context.selected_conversation();
        policy::should_notify(
            conversation.key(),
            self.context.own_status(),
            selected.as_ref(),
            self.background.is_in_background(),
            self.context.settings().always_notify,
        )
    }

    /// Alert the user about an event in `conversation`.
    ///
    /// Plays `sound` and, when enabled and permitted, surfaces a system
    /// notification. Never blocks and never fails: every degradation is
    /// logged and absorbed. Must be called within a tokio runtime.
    ///
    /// # Panics
    ///
    /// If `sound` was never preloaded into the cue pool.
    pub fn notify(
        &self,
        conversation: Arc<dyn Conversation>,
        title: &str,
        body: &str,
        icon: Option<&str>,
        sound: &str,
    ) {
        if !self.should_notify(conversation.as_ref()) {
            debug!(key = %conversation.key(), "alert suppressed by policy");
            return;
        }

        self.audio.play(sound);

        let settings = self.context.settings();
        if !settings.enabled {
            return;
        }
        let Some(center) = &self.notifier else {
            debug!("no notification capability, skipping system notification");
            return;
        };
        if center.permission() != Permission::Granted {
            debug!(permission = ?center.permission(), "notification permission not granted");
            return;
        }

        let options = options_for(&settings, conversation.key(), body, icon);
        let record = match center.show(title, options) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %conversation.key(), error = %e, "failed to show notification");
                return;
            }
        };

        let weak = Arc::downgrade(&record);
        let window = Arc::clone(&self.window);
        record.set_on_click(move || {
            conversation.show();
            window.focus();
            if let Some(record) = weak.upgrade() {
                record.close();
            }
        });

        let weak = Arc::downgrade(&record);
        tokio::spawn(async move {
            tokio::time::sleep(AUTO_CLOSE_AFTER).await;
            if let Some(record) = weak.upgrade() {
                record.close();
            }
        });
    }

    /// Ask the platform for notification permission.
    ///
    /// `None` when there is no notification capability at all.
    pub async fn request_permission(&self) -> Option<Permission> {
        let center = self.notifier.as_ref()?;
        let permission = center.request_permission().await;
        debug!(?permission, "notification permission requested");
        Some(permission)
    }
}

/// Options for a system notification about `key`.
pub fn options_for(
    settings: &NotificationSettings,
    key: &ConversationKey,
    body: &str,
    icon: Option<&str>,
) -> NotificationOptions {
    NotificationOptions {
        body: body.to_string(),
        icon: if settings.show_avatars {
            icon.map(str::to_string)
        } else {
            None
        },
        badge: settings.badge.clone(),
        silent: true,
        tag: key.clone(),
        renotify: true,
        data: NotificationData { key: key.clone() },
    }
}
