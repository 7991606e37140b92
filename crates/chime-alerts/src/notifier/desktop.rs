#[cfg(all(unix, not(target_os = "macos")))]
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(all(unix, not(target_os = "macos")))]
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
#[cfg(all(unix, not(target_os = "macos")))]
use chime_common::ConversationKey;
use chime_common::PlatformError;
use notify_rust::Notification;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{NotificationPresenter, NotificationRecord, Permission};

/// Channel on which activated notifications are handed back.
pub type ActivationSender = mpsc::UnboundedSender<Arc<NotificationRecord>>;

/// Presents notifications through the OS notification service.
///
/// On freedesktop systems a notification re-uses the server id of the
/// previous one with the same tag, so the daemon replaces it in place.
/// Elsewhere the OS decides how entries stack.
pub struct DesktopPresenter {
    app_name: String,
    activations: Option<ActivationSender>,
    #[cfg(all(unix, not(target_os = "macos")))]
    server_ids: Mutex<HashMap<ConversationKey, u32>>,
}

impl DesktopPresenter {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            activations: None,
            #[cfg(all(unix, not(target_os = "macos")))]
            server_ids: Mutex::new(HashMap::new()),
        }
    }

    /// Send every notification the user activates on `tx`.
    ///
    /// Only freedesktop servers report activation; elsewhere nothing is
    /// ever sent.
    pub fn with_activations(mut self, tx: ActivationSender) -> Self {
        self.activations = Some(tx);
        self
    }

    fn build(&self, record: &NotificationRecord) -> Notification {
        let options = record.options();
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(record.title())
            .body(&options.body);
        if let Some(icon) = &options.icon {
            notification.icon(icon);
        }
        notification
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn deliver(&self, record: &Arc<NotificationRecord>) -> Result<(), PlatformError> {
        use notify_rust::{Hint, Timeout};

        let mut notification = self.build(record);
        notification
            .hint(Hint::SuppressSound(record.options().silent))
            .timeout(Timeout::Milliseconds(5000));
        if self.activations.is_some() {
            notification.action("default", "Open");
        }

        let mut ids = self.server_ids.lock().unwrap_or_else(PoisonError::into_inner);
        if record.options().renotify {
            if let Some(id) = ids.get(record.tag()) {
                notification.id(*id);
            }
        }
        let handle = notification
            .show()
            .map_err(|e| PlatformError::NotificationError(e.to_string()))?;
        ids.insert(record.tag().clone(), handle.id());
        drop(ids);

        // A replacement re-uses the server id, so an older watcher may see
        // the same click; its record answers as stale.
        if let Some(tx) = self.activations.clone() {
            let record = Arc::clone(record);
            let spawned = std::thread::Builder::new()
                .name("chime-notification".into())
                .spawn(move || {
                    handle.wait_for_action(|action| {
                        if action != "default" {
                            return;
                        }
                        let tag = record.tag().clone();
                        if tx.send(Arc::clone(&record)).is_err() {
                            debug!(tag = %tag, "activation dropped: receiver gone");
                        }
                    });
                });
            if let Err(e) = spawned {
                warn!(error = %e, "failed to watch notification for activation");
            }
        }
        Ok(())
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn deliver(&self, record: &Arc<NotificationRecord>) -> Result<(), PlatformError> {
        if self.activations.is_some() {
            debug!(tag = %record.tag(), "activation is not reported on this platform");
        }
        self.build(record)
            .show()
            .map(|_| ())
            .map_err(|e| PlatformError::NotificationError(e.to_string()))
    }
}

impl Default for DesktopPresenter {
    fn default() -> Self {
        Self::new("Chime")
    }
}

#[async_trait]
impl NotificationPresenter for DesktopPresenter {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn present(&self, record: &Arc<NotificationRecord>) -> Result<(), PlatformError> {
        self.deliver(record)?;
        info!(tag = %record.tag(), "native notification sent");
        Ok(())
    }

    fn withdraw(&self, record: &NotificationRecord) {
        debug!(tag = %record.tag(), "native notifications expire on their own");
    }

    fn supports_close(&self) -> bool {
        false
    }
}
