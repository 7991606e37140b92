use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::ConversationKey;

/// Host-side events. Worker tasks publish these; the UI thread drains them
/// between frames, since only it may touch the window and page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A conversation asked to be brought into view.
    ConversationShown(ConversationKey),
    /// Something asked for the host window to take focus.
    FocusRequested,
    NotificationShown { tag: ConversationKey },
    NotificationClosed { tag: ConversationKey },
    #[serde(other)]
    Unknown,
}

/// Fan-out of [`Event`]s. Clones share one channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Slow subscribers past `capacity` buffered events see `Lagged`.
    pub fn new(capacity: usize) -> Self {
        Self {
            sender: broadcast::Sender::new(capacity),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers will see `event`; none is not an error.
    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or_default()
    }
}
