//! The WebView hosting the chat UI.
//!
//! [`WebViewHost`] builds the `wry` WebView with the bridge script, IPC
//! handler, page-load tracking, navigation policy and the `chime://`
//! asset protocol. Callbacks only push [`WebViewEvent`]s into a shared
//! sink; the event loop drains it.

use std::sync::{Arc, Mutex, PoisonError};

mod content;
mod handle;
mod handlers;
mod types;

pub use content::ContentProvider;
pub use handle::BridgeWebView;
pub use handlers::{is_navigation_allowed, profile_from_link};
pub use types::WebViewConfig;

use crate::events::PageLoadState;

/// Raised by WebView callbacks, consumed by the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum WebViewEvent {
    PageLoad { state: PageLoadState, url: String },
    /// Raw `postMessage` body; already checked to be JSON.
    IpcMessage { body: String },
    /// A profile link was followed inside the page.
    ProfileLink { character: String },
}

pub type EventSink = Arc<Mutex<Vec<WebViewEvent>>>;

pub struct WebViewHost {
    events: EventSink,
    content_provider: Option<Arc<ContentProvider>>,
}

impl WebViewHost {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            content_provider: None,
        }
    }

    /// Serve bundled assets through `chime://`.
    pub fn set_content_provider(&mut self, provider: ContentProvider) {
        self.content_provider = Some(Arc::new(provider));
    }

    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }
}

impl Default for WebViewHost {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn push_event(events: &EventSink, event: WebViewEvent) {
    events
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(event);
}
