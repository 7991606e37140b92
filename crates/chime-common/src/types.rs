//! Shared domain types: user status and conversation identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The user's own presence status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Online,
    Looking,
    Busy,
    Away,
    Idle,
    Dnd,
    Offline,
}

impl UserStatus {
    /// Do-not-disturb suppresses every alert, unconditionally.
    pub fn is_do_not_disturb(self) -> bool {
        self == Self::Dnd
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Looking => "looking",
            Self::Busy => "busy",
            Self::Away => "away",
            Self::Idle => "idle",
            Self::Dnd => "dnd",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a conversation. Doubles as the notification tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationKey(String);

impl ConversationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversationKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ConversationKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dnd_is_do_not_disturb() {
        let all = [
            UserStatus::Online,
            UserStatus::Looking,
            UserStatus::Busy,
            UserStatus::Away,
            UserStatus::Idle,
            UserStatus::Dnd,
            UserStatus::Offline,
        ];
        let dnd: Vec<_> = all.iter().filter(|s| s.is_do_not_disturb()).collect();
        assert_eq!(dnd, vec![&UserStatus::Dnd]);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserStatus::Dnd).unwrap(), "\"dnd\"");
        let parsed: UserStatus = serde_json::from_str("\"looking\"").unwrap();
        assert_eq!(parsed, UserStatus::Looking);
    }

    #[test]
    fn status_display_matches_wire_name() {
        assert_eq!(UserStatus::Away.to_string(), "away");
        assert_eq!(UserStatus::default(), UserStatus::Online);
    }

    #[test]
    fn conversation_key_is_transparent() {
        let key = ConversationKey::from("#adh-1234");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"#adh-1234\"");
        let back: ConversationKey = serde_json::from_str("\"#adh-1234\"").unwrap();
        assert_eq!(back, key);
        assert_eq!(key.to_string(), "#adh-1234");
    }
}
