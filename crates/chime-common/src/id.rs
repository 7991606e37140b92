use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one surfaced system notification.
///
/// Distinct from its tag: a replacement shares the tag of the record it
/// replaces but never its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first group is enough to tell records apart in logs.
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}
