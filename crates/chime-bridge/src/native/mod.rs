//! Outbound native calls.
//!
//! A [`NativeHost`] answers each [`NativeCall`] synchronously with a
//! JSON-encoded string. [`NativeClient`] is the only thing that talks to
//! it: it decodes the string once, right after the call returns, so
//! callers only ever see typed values.

mod client;
mod fs;

pub use client::NativeClient;
pub use fs::FsNativeHost;

use std::collections::BTreeMap;

use chime_common::{BridgeError, ConversationKey};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One outbound call, as the page issues it:
/// `{"method": "getLogs", "args": {"key": "...", "date": "2024-05-01"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "camelCase")]
pub enum NativeCall {
    ListFiles {
        path: String,
    },
    ListDirectories {
        path: String,
    },
    /// Open the logs of `character`. Returns the [`LogIndex`].
    Init {
        character: String,
    },
    GetBacklog {
        key: ConversationKey,
    },
    GetLogs {
        key: ConversationKey,
        date: NaiveDate,
    },
    LogMessage {
        key: ConversationKey,
        name: String,
        message: LogMessage,
    },
    SetBackground {
        enabled: bool,
    },
}

impl NativeCall {
    pub fn method(&self) -> &'static str {
        match self {
            Self::ListFiles { .. } => "listFiles",
            Self::ListDirectories { .. } => "listDirectories",
            Self::Init { .. } => "init",
            Self::GetBacklog { .. } => "getBacklog",
            Self::GetLogs { .. } => "getLogs",
            Self::LogMessage { .. } => "logMessage",
            Self::SetBackground { .. } => "setBackground",
        }
    }
}

/// The raw native capability.
pub trait NativeHost: Send + Sync + 'static {
    /// Perform `call`, returning its result as a JSON string. May block.
    fn invoke(&self, call: &NativeCall) -> Result<String, BridgeError>;

    /// Release listeners, threads and handles. Called once, on teardown.
    fn release(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Message,
    Action,
    Ad,
    Roll,
    Warn,
    Event,
}

/// One logged chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub time: DateTime<Utc>,
    pub kind: MessageKind,
    pub sender: String,
    pub text: String,
}

/// A logged conversation: display name and the days it has logs for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogIndexEntry {
    pub name: String,
    pub dates: Vec<NaiveDate>,
}

pub type LogIndex = BTreeMap<ConversationKey, LogIndexEntry>;
