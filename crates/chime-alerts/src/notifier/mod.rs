//! System notifications.
//!
//! [`NotificationCenter`] keeps the live records and implements the
//! tag semantics (one visible entry per conversation, idempotent close,
//! exactly-once click). A [`NotificationPresenter`] does the actual
//! delivery on a given platform.

mod center;
mod desktop;
mod record;

pub use center::NotificationCenter;
pub use desktop::{ActivationSender, DesktopPresenter};
pub use record::{Activation, NotificationRecord};

use std::sync::Arc;

use async_trait::async_trait;
use chime_common::{ConversationKey, PlatformError};
use serde::{Deserialize, Serialize};

/// Notification permission, as the platform reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Never asked.
    #[default]
    Default,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    pub key: ConversationKey,
}

/// Everything but the title of a system notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub body: String,
    /// Absent when avatars are disabled. Presenters must cope with `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub badge: String,
    /// Audio is played separately; the OS must stay quiet.
    pub silent: bool,
    /// Entries sharing a tag replace each other.
    pub tag: ConversationKey,
    pub renotify: bool,
    pub data: NotificationData,
}

/// Platform delivery of system notifications.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    fn permission(&self) -> Permission;

    async fn request_permission(&self) -> Permission;

    /// Surface `record`, replacing whatever is visible under the same tag.
    ///
    /// Presenters that learn about clicks hold on to `record` and deliver
    /// them through [`NotificationRecord::activate`].
    fn present(&self, record: &Arc<NotificationRecord>) -> Result<(), PlatformError>;

    /// Remove `record` from view. Only called when [`supports_close`](Self::supports_close);
    /// other records are only forgotten on our side.
    fn withdraw(&self, record: &NotificationRecord);

    /// Whether surfaced notifications can be closed from our side.
    fn supports_close(&self) -> bool;
}
