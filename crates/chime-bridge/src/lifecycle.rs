use std::sync::Arc;

use chime_alerts::BackgroundState;
use chime_common::BridgeError;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::events::{BackDecision, BridgeEvent};
use crate::inbound::{self, BridgeSender, EventRedispatcher};
use crate::native::{NativeClient, NativeHost};

/// Owns the native side of the bridge for the lifetime of the page.
///
/// Call [`destroy`](Self::destroy) before the WebView is torn down; it
/// also runs on drop.
pub struct NativeBridge {
    client: Arc<NativeClient>,
    sender: Option<BridgeSender>,
    background: Arc<BackgroundState>,
}

impl NativeBridge {
    /// Create the bridge and the UI-thread half that delivers its events.
    pub fn new(
        host: Arc<dyn NativeHost>,
        background: Arc<BackgroundState>,
    ) -> (Self, EventRedispatcher) {
        let (sender, redispatcher) = inbound::channel();
        let bridge = Self {
            client: Arc::new(NativeClient::new(host)),
            sender: Some(sender),
            background,
        };
        (bridge, redispatcher)
    }

    pub fn client(&self) -> Arc<NativeClient> {
        Arc::clone(&self.client)
    }

    fn send(&self, event: BridgeEvent) -> Result<(), BridgeError> {
        let sender = self.sender.as_ref().ok_or(BridgeError::Closed)?;
        let kind = event.dom_type();
        sender.send(event)?;
        debug!(kind, "bridge event queued");
        Ok(())
    }

    pub fn open_profile(&self, character: &str) -> Result<(), BridgeError> {
        self.send(BridgeEvent::OpenProfile {
            character: character.to_string(),
        })
    }

    pub fn notification_clicked(&self, data: serde_json::Value) -> Result<(), BridgeError> {
        self.send(BridgeEvent::NotificationClicked { data })
    }

    /// Ask the page about a back press. The receiver yields
    /// [`BackDecision::Prevented`] only if the page called `preventDefault()`;
    /// if it closes without an answer, treat it as [`BackDecision::Default`].
    pub fn back_pressed(&self) -> Result<oneshot::Receiver<BackDecision>, BridgeError> {
        let (tx, rx) = oneshot::channel();
        self.send(BridgeEvent::BackPressed(tx))?;
        Ok(rx)
    }

    /// Record a foreground/background transition.
    ///
    /// The flag alerting reads is updated immediately; the page hears
    /// about it only when the state actually changed.
    pub fn set_in_background(&self, background: bool) {
        if self.background.set_in_background(background) == background {
            return;
        }
        info!(background, "host lifecycle changed");
        if let Err(e) = self.send(BridgeEvent::LifecycleChanged { background }) {
            debug!(error = %e, "lifecycle event not delivered");
        }
    }

    pub fn is_in_background(&self) -> bool {
        self.background.is_in_background()
    }

    pub fn is_destroyed(&self) -> bool {
        self.sender.is_none()
    }

    /// Stop accepting events and release the native host. Idempotent.
    pub fn destroy(&mut self) {
        if self.sender.take().is_none() {
            return;
        }
        self.client.release_now();
        info!("native bridge destroyed");
    }
}

impl Drop for NativeBridge {
    fn drop(&mut self) {
        if !self.is_destroyed() {
            warn!("native bridge dropped without destroy");
            self.destroy();
        }
    }
}
