//! Alerting for incoming conversation events.
//!
//! Decides whether an event deserves the user's attention
//! ([`policy::should_notify`]) and drives the two alert channels:
//! an audio cue ([`AudioCuePool`]) and a system notification
//! ([`NotificationCenter`]). [`NotificationDispatcher`] ties them together.
//!
//! Everything platform-specific sits behind a seam trait:
//! [`AudioBackend`], [`NotificationPresenter`], [`HostWindow`] and
//! [`Conversation`]. Settings, status and selection come in read-only
//! through [`AlertContext`].

pub mod audio;
pub mod context;
pub mod conversation;
pub mod dispatcher;
pub mod notifier;
pub mod policy;

#[cfg(test)]
pub(crate) mod test_support;

pub use audio::{AudioBackend, AudioCuePool, AudioElement, AudioSource};
pub use context::{AlertContext, BackgroundState, SessionState};
pub use conversation::{Conversation, HostWindow};
pub use dispatcher::{NotificationDispatcher, AUTO_CLOSE_AFTER};
pub use notifier::{
    Activation, ActivationSender, DesktopPresenter, NotificationCenter, NotificationOptions, NotificationPresenter,
    NotificationRecord, Permission,
};
pub use policy::should_notify;
