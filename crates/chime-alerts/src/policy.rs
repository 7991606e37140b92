//! The alert decision.

use chime_common::{ConversationKey, UserStatus};

/// Decide whether an event in `conversation` should alert the user.
///
/// Do-not-disturb always wins. Otherwise any one of these is enough:
/// the app is in the background, the conversation is not the one on
/// screen, or the user asked to always be notified.
pub fn should_notify(
    conversation: &ConversationKey,
    own_status: UserStatus,
    selected: Option<&ConversationKey>,
    is_in_background: bool,
    always_notify: bool,
) -> bool {
    if own_status.is_do_not_disturb() {
        return false;
    }
    is_in_background || selected != Some(conversation) || always_notify
}
