//! Host-side stand-ins for the chat layer's conversation and window.
//!
//! Both only publish on the event bus; the UI thread acts on the events
//! while polling.

use chime_alerts::{Conversation, HostWindow};
use chime_common::{ConversationKey, Event, EventBus};

/// A conversation the page asked to be alerted about.
pub(super) struct PageConversation {
    key: ConversationKey,
    bus: EventBus,
}

impl PageConversation {
    pub(super) fn new(key: ConversationKey, bus: EventBus) -> Self {
        Self { key, bus }
    }
}

impl Conversation for PageConversation {
    fn key(&self) -> &ConversationKey {
        &self.key
    }

    fn show(&self) {
        self.bus.publish(Event::ConversationShown(self.key.clone()));
    }
}

pub(super) struct BusWindow {
    bus: EventBus,
}

impl BusWindow {
    pub(super) fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl HostWindow for BusWindow {
    fn focus(&self) {
        self.bus.publish(Event::FocusRequested);
    }
}
