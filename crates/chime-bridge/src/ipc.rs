//! IPC between the page and the host.
//!
//! - **JS -> Rust**: `window.chime.send(kind, payload)` posts
//!   `{"kind": ..., "payload": ...}` through `window.ipc.postMessage`.
//! - **Rust -> JS**: queued scripts (see [`crate::script`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A message posted by the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default = "IpcPayload::none")]
    pub payload: IpcPayload,
}

/// Payload of an IPC message: a bare string or structured JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcPayload {
    Text(String),
    Json(serde_json::Value),
}

impl IpcPayload {
    fn none() -> Self {
        Self::Json(serde_json::Value::Null)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::Json(serde_json::Value::Null))
    }

    /// The text of a string payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(_) => None,
        }
    }

    /// Decode the payload into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Self::Text(s) => serde_json::from_value(serde_json::Value::String(s.clone())),
            Self::Json(v) => T::deserialize(v),
        }
    }
}

impl IpcMessage {
    /// Parse a raw `postMessage` body.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn text(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: IpcPayload::Text(text.into()),
        }
    }

    pub fn json(kind: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload: IpcPayload::Json(value),
        }
    }
}
