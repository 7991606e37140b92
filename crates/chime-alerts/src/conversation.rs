use chime_common::ConversationKey;

/// A conversation an alert is about. Owned by the chat layer.
pub trait Conversation: Send + Sync {
    fn key(&self) -> &ConversationKey;

    /// Bring the conversation into view.
    fn show(&self);
}

/// The window hosting the UI.
pub trait HostWindow: Send + Sync {
    fn focus(&self);
}
