//! Native bridge between the Chime host shell and its web UI.
//!
//! - Outbound: typed asynchronous native calls ([`NativeClient`]) over a
//!   raw string-returning [`NativeHost`], decoded exactly once.
//! - Inbound: native events buffered until the page has loaded and
//!   redispatched as DOM custom events ([`EventRedispatcher`]).
//! - Lifecycle: background tracking and teardown ([`NativeBridge`]).
//! - Hosting: the `wry` WebView, `chime://` assets and the audio
//!   elements that live inside the page.

pub mod audio;
pub mod events;
pub mod inbound;
pub mod ipc;
pub mod lifecycle;
pub mod native;
pub mod script;
pub mod webview;

pub use audio::{PlayResult, ScriptAudioBackend, ScriptQueue};
pub use events::{BackDecision, BridgeEvent, PageLoadState};
pub use inbound::{BridgeSender, EventRedispatcher, UiEventTarget};
pub use ipc::{IpcMessage, IpcPayload};
pub use lifecycle::NativeBridge;
pub use native::{FsNativeHost, LogIndex, LogMessage, NativeCall, NativeClient, NativeHost};
pub use webview::{BridgeWebView, ContentProvider, WebViewConfig, WebViewEvent, WebViewHost};
