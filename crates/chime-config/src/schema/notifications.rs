//! Alert settings: which channels are enabled and how they behave.

use serde::{Deserialize, Serialize};

/// User-facing notification settings.
///
/// Audio and system notifications are independent opt-ins: `play_sound`
/// gates the chime, `enabled` gates the desktop notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Show system notifications.
    pub enabled: bool,
    /// Play an audio cue.
    pub play_sound: bool,
    /// Attach the sender's avatar as the notification icon.
    pub show_avatars: bool,
    /// Alert even for the conversation currently on screen.
    pub always_notify: bool,
    /// Badge image, relative to the bridge assets directory.
    pub badge: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            play_sound: true,
            show_avatars: true,
            always_notify: false,
            badge: "ic_notification.png".into(),
        }
    }
}
