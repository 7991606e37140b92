//! Native-originated events and page lifecycle.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded (DOMContentLoaded + resources).
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// What the page decided about a back-button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackDecision {
    /// The page called `preventDefault()`; the host must do nothing.
    Prevented,
    /// Unhandled; the host performs its default back navigation.
    Default,
}

/// An event the host pushes into the page. Consumed exactly once.
#[derive(Debug)]
pub enum BridgeEvent {
    /// A profile link was followed. Dispatched as `open-profile`.
    OpenProfile { character: String },
    /// A system notification was clicked. Dispatched as `notification-clicked`.
    NotificationClicked { data: serde_json::Value },
    /// Dispatched as a cancelable `backbutton`; the page's decision is sent back.
    BackPressed(oneshot::Sender<BackDecision>),
    /// Dispatched as `lifecycle-changed`.
    LifecycleChanged { background: bool },
}

impl BridgeEvent {
    /// DOM event type this is redispatched as.
    pub fn dom_type(&self) -> &'static str {
        match self {
            Self::OpenProfile { .. } => "open-profile",
            Self::NotificationClicked { .. } => "notification-clicked",
            Self::BackPressed(_) => "backbutton",
            Self::LifecycleChanged { .. } => "lifecycle-changed",
        }
    }
}
