//! IPC message dispatch: routes page messages to the bridge and alerting.

use std::sync::Arc;

use serde::Deserialize;

use chime_alerts::Activation;
use chime_bridge::{IpcMessage, IpcPayload, NativeCall, PlayResult};
use chime_common::{ConversationKey, UserStatus};

use super::core::ChimeApp;
use super::host::PageConversation;
use super::types::CallOutcome;

// =============================================================================
// IPC ALLOWLIST
// =============================================================================

/// IPC message kinds the page may send. Everything else is rejected.
pub(super) const ALLOWED_IPC_KINDS: &[&str] = &[
    "native_call",
    "notify",
    "request_permission",
    "preload_sounds",
    "set_status",
    "select_conversation",
    "audio_result",
    "notification_activated",
];

pub(super) fn is_ipc_kind_allowed(kind: &str) -> bool {
    ALLOWED_IPC_KINDS.contains(&kind)
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize)]
struct NativeCallRequest {
    id: u64,
    /// Decoded separately so a bad call can still be answered by id.
    call: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct NotifyRequest {
    key: ConversationKey,
    title: String,
    body: String,
    #[serde(default)]
    icon: Option<String>,
    sound: String,
}

#[derive(Debug, Default, Deserialize)]
struct PreloadRequest {
    /// Defaults to the configured cue list.
    #[serde(default)]
    names: Option<Vec<String>>,
}

// =============================================================================
// DISPATCH
// =============================================================================

impl ChimeApp {
    pub(super) fn handle_ipc_message(&mut self, body: &str) {
        let Some(msg) = IpcMessage::from_json(body) else {
            tracing::warn!(body_len = body.len(), "IPC message rejected: not an IPC envelope");
            return;
        };

        if !is_ipc_kind_allowed(&msg.kind) {
            tracing::warn!(kind = %msg.kind, "IPC message rejected: unknown kind");
            return;
        }

        tracing::debug!(kind = %msg.kind, "IPC message");
        match msg.kind.as_str() {
            "native_call" => self.handle_native_call(&msg.payload),
            "notify" => self.handle_notify(&msg.payload),
            "request_permission" => self.handle_request_permission(),
            "preload_sounds" => self.handle_preload_sounds(&msg.payload),
            "set_status" => match msg.payload.decode::<UserStatus>() {
                Ok(status) => {
                    tracing::debug!(status = status.as_str(), "own status changed");
                    self.session.set_status(status);
                }
                Err(e) => tracing::warn!("set_status: bad payload: {e}"),
            },
            "select_conversation" => match msg.payload.decode::<Option<ConversationKey>>() {
                Ok(key) => self.session.select(key),
                Err(e) => tracing::warn!("select_conversation: bad payload: {e}"),
            },
            "audio_result" => match msg.payload.decode::<PlayResult>() {
                Ok(result) => {
                    self.audio_backend.resolve(result);
                }
                Err(e) => tracing::warn!("audio_result: bad payload: {e}"),
            },
            "notification_activated" => match msg.payload.decode::<ConversationKey>() {
                Ok(key) => self.activate_notification(key),
                Err(e) => tracing::warn!("notification_activated: bad payload: {e}"),
            },
            _ => {}
        }
    }

    fn handle_native_call(&mut self, payload: &IpcPayload) {
        let request: NativeCallRequest = match payload.decode() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("native_call: bad payload: {e}");
                return;
            }
        };
        let id = request.id;

        let call = match NativeCall::deserialize(&request.call) {
            Ok(call) => call,
            Err(e) => {
                self.finish_call(id, Err(format!("invalid native call: {e}")));
                return;
            }
        };
        let (Some(bridge), Some(rt)) = (&self.bridge, &self.tokio_runtime) else {
            self.finish_call(id, Err("native bridge unavailable".into()));
            return;
        };

        let client = bridge.client();
        let tx = self.call_tx.clone();
        rt.spawn(async move {
            let method = call.method();
            let result = client.call_value(call).await.map_err(|e| {
                tracing::warn!(id, method, error = %e, "native call failed");
                e.to_string()
            });
            let _ = tx.send(CallOutcome { id, result });
        });
    }

    fn finish_call(&self, id: u64, result: Result<serde_json::Value, String>) {
        let _ = self.call_tx.send(CallOutcome { id, result });
    }

    fn handle_notify(&mut self, payload: &IpcPayload) {
        let request: NotifyRequest = match payload.decode() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("notify: bad payload: {e}");
                return;
            }
        };
        if !self.dispatcher.audio().is_known(&request.sound) {
            tracing::warn!(cue = %request.sound, "notify rejected: cue was never preloaded");
            return;
        }
        let Some(rt) = &self.tokio_runtime else {
            return;
        };

        let conversation = Arc::new(PageConversation::new(
            request.key,
            self.event_bus.clone(),
        ));
        let dispatcher = Arc::clone(&self.dispatcher);
        // Presenting may talk to the notification daemon; keep it off the UI thread.
        rt.spawn_blocking(move || {
            dispatcher.notify(
                conversation,
                &request.title,
                &request.body,
                request.icon.as_deref(),
                &request.sound,
            );
        });
    }

    fn handle_request_permission(&self) {
        let Some(rt) = &self.tokio_runtime else {
            return;
        };
        let dispatcher = Arc::clone(&self.dispatcher);
        rt.spawn(async move {
            match dispatcher.request_permission().await {
                Some(permission) => tracing::info!(?permission, "notification permission"),
                None => tracing::info!("notifications are not supported"),
            }
        });
    }

    fn handle_preload_sounds(&self, payload: &IpcPayload) {
        let request = if payload.is_none() {
            PreloadRequest::default()
        } else {
            match payload.decode::<PreloadRequest>() {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!("preload_sounds: bad payload: {e}");
                    return;
                }
            }
        };
        let names = request
            .names
            .unwrap_or_else(|| self.config.sounds.preload.clone());
        self.preload_sounds(names);
    }

    /// The page reports a click on the notification for `key`.
    pub(super) fn activate_notification(&self, key: ConversationKey) {
        let outcome = match self.dispatcher.notifier() {
            Some(center) => center.activate(&key),
            None => Activation::Unclaimed,
        };
        self.settle_activation(&key, outcome);
    }

    /// A click nothing live claimed reaches the page as a
    /// `notification-clicked` event. Stale clicks are dropped.
    pub(super) fn settle_activation(&self, key: &ConversationKey, outcome: Activation) {
        match outcome {
            Activation::Handled => {}
            Activation::Stale => {
                tracing::debug!(key = %key, "stale notification click ignored");
            }
            Activation::Unclaimed => {
                let Some(bridge) = &self.bridge else {
                    tracing::debug!(key = %key, "notification activation dropped: no bridge");
                    return;
                };
                if let Err(e) = bridge.notification_clicked(serde_json::json!(key)) {
                    tracing::warn!(key = %key, error = %e, "failed to forward notification click");
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
