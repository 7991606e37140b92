//! Polling: moves work between the WebView, the bridge and alerting.
//!
//! Everything touching the WebView happens here, on the UI thread. Worker
//! tasks only ever queue scripts or send on channels.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast::error::TryRecvError as BusError;
use tokio::sync::oneshot::error::TryRecvError;
use winit::event_loop::{ActiveEventLoop, ControlFlow};

use chime_bridge::{script, BackDecision, PageLoadState, WebViewEvent};
use chime_common::Event;

use super::core::ChimeApp;
use super::types::POLL_INTERVAL;

/// DOM event asking the page to bring a conversation into view.
const SHOW_CONVERSATION_EVENT: &str = "show-conversation";

impl ChimeApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_webview_events();
            self.poll_call_results();
            self.poll_activations();
            self.poll_host_events();
            self.poll_back_decisions();
            self.pump_bridge_events();
            self.flush_scripts();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    fn poll_webview_events(&mut self) {
        for event in self.webview_host.drain_events() {
            match event {
                WebViewEvent::PageLoad { state, url } => {
                    tracing::debug!(?state, url = %url, "page load");
                    self.on_page_load(state);
                }
                WebViewEvent::IpcMessage { body } => self.handle_ipc_message(&body),
                WebViewEvent::ProfileLink { character } => {
                    if let Some(ref bridge) = self.bridge {
                        if let Err(e) = bridge.open_profile(&character) {
                            tracing::warn!(character = %character, "Failed to open profile: {e}");
                        }
                    }
                }
            }
        }
    }

    /// A navigation away from a loaded page takes its audio elements with
    /// it; recreate them so they are waiting when the new page is ready.
    pub(super) fn on_page_load(&mut self, state: PageLoadState) {
        let was_ready = self
            .redispatcher
            .as_ref()
            .is_some_and(|r| r.is_page_ready());
        if let Some(ref mut redispatcher) = self.redispatcher {
            redispatcher.on_page_load(state);
        }
        if state != PageLoadState::Started || !was_ready {
            return;
        }

        self.audio_backend.abandon_pending();
        let Some(rt) = &self.tokio_runtime else {
            return;
        };
        let audio = Arc::clone(self.dispatcher.audio());
        rt.spawn(async move { audio.reload().await });
    }

    /// Hand finished native calls back to the page.
    fn poll_call_results(&mut self) {
        while let Ok(outcome) = self.call_rx.try_recv() {
            let result = outcome.result.as_ref().map_err(String::as_str);
            match self.webview {
                Some(ref webview) => webview.resolve_call(outcome.id, result),
                None => tracing::debug!(id = outcome.id, "native call result dropped: no page"),
            }
        }
    }

    fn poll_activations(&mut self) {
        while let Ok(record) = self.activation_rx.try_recv() {
            tracing::debug!(key = %record.tag(), id = %record.id(), "notification activated");
            let outcome = record.activate();
            self.settle_activation(record.tag(), outcome);
        }
    }

    fn poll_host_events(&mut self) {
        loop {
            match self.bus_rx.try_recv() {
                Ok(Event::ConversationShown(key)) => {
                    self.scripts.push(script::custom_event(
                        SHOW_CONVERSATION_EVENT,
                        &serde_json::json!(key),
                    ));
                }
                Ok(Event::FocusRequested) => self.focus_window(),
                Ok(_) => {}
                Err(BusError::Lagged(n)) => {
                    tracing::warn!("host event bus lagged by {n} events");
                }
                Err(BusError::Empty) | Err(BusError::Closed) => break,
            }
        }
    }

    /// Settle back presses the page has answered. Only an explicit
    /// `preventDefault()` keeps the window in front.
    fn poll_back_decisions(&mut self) {
        let mut take_default = false;
        self.pending_back.retain_mut(|decision| match decision.try_recv() {
            Ok(BackDecision::Prevented) => false,
            Ok(BackDecision::Default) | Err(TryRecvError::Closed) => {
                take_default = true;
                false
            }
            Err(TryRecvError::Empty) => true,
        });
        if take_default {
            self.back_default();
        }
    }

    fn pump_bridge_events(&mut self) {
        if let (Some(redispatcher), Some(webview)) = (&mut self.redispatcher, &self.webview) {
            redispatcher.pump(webview);
        }
    }

    /// Run queued scripts once the page can receive them.
    fn flush_scripts(&mut self) {
        let ready = self
            .redispatcher
            .as_ref()
            .is_some_and(|r| r.is_page_ready());
        if !ready || self.scripts.is_empty() {
            return;
        }
        if let Some(ref webview) = self.webview {
            webview.run_scripts(self.scripts.drain());
        }
    }

    fn focus_window(&self) {
        if let Some(ref window) = self.window {
            window.set_minimized(false);
            window.focus_window();
        }
        if let Some(ref webview) = self.webview {
            if let Err(e) = webview.focus() {
                tracing::debug!("Failed to focus WebView: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::core::test_app::app;
    use crate::app_state::types::CallOutcome;
    use tokio::sync::oneshot;

    #[test]
    fn shown_conversation_queues_a_page_event() {
        let mut app = app();
        app.event_bus
            .publish(Event::ConversationShown("alice".into()));

        app.poll_host_events();

        let scripts = app.scripts.drain();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("show-conversation"));
        assert!(scripts[0].contains("\"alice\""));
    }

    #[test]
    fn notification_events_are_skipped() {
        let mut app = app();
        app.event_bus.publish(Event::NotificationShown { tag: "alice".into() });
        app.event_bus.publish(Event::FocusRequested);
        app.poll_host_events();
        assert!(app.scripts.is_empty());
        assert!(matches!(app.bus_rx.try_recv(), Err(BusError::Empty)));
    }

    #[test]
    fn answered_back_presses_are_settled() {
        let mut app = app();
        let (prevented_tx, prevented_rx) = oneshot::channel();
        let (default_tx, default_rx) = oneshot::channel();
        let (_waiting_tx, waiting_rx) = oneshot::channel();
        let (closed_tx, closed_rx) = oneshot::channel::<BackDecision>();
        app.pending_back = vec![prevented_rx, default_rx, waiting_rx, closed_rx];

        prevented_tx.send(BackDecision::Prevented).unwrap();
        default_tx.send(BackDecision::Default).unwrap();
        drop(closed_tx);

        app.poll_back_decisions();
        assert_eq!(app.pending_back.len(), 1);
    }

    #[test]
    fn scripts_wait_for_the_page() {
        let mut app = app();
        app.scripts.push("1;".into());
        app.flush_scripts();
        assert_eq!(app.scripts.len(), 1);
    }

    #[test]
    fn call_results_without_page_are_dropped() {
        let mut app = app();
        app.call_tx
            .send(CallOutcome {
                id: 1,
                result: Ok(serde_json::json!([])),
            })
            .unwrap();
        app.poll_call_results();
        assert!(app.call_rx.try_recv().is_err());
    }

    /// Drain queued scripts until one satisfies `pred`, giving spawned
    /// work up to a second to queue it.
    fn wait_for_script(app: &ChimeApp, pred: impl Fn(&str) -> bool) -> bool {
        let rt = app.tokio_runtime.as_ref().unwrap();
        rt.block_on(async {
            for _ in 0..100 {
                if app.scripts.drain().iter().any(|s| pred(s)) {
                    return true;
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
            false
        })
    }

    fn creates_chat(script: &str) -> bool {
        script.starts_with("window.chime.audio.create(\"chat\"")
    }

    #[test]
    fn navigation_recreates_audio_cues() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app();
        app.launch.data_dir = Some(dir.path().to_path_buf());
        app.initialize_bridge();

        app.preload_sounds(vec!["chat".to_string()]);
        assert!(wait_for_script(&app, creates_chat));
        app.on_page_load(PageLoadState::Finished);

        app.on_page_load(PageLoadState::Started);

        assert!(wait_for_script(&app, creates_chat));
        assert!(app.dispatcher.audio().is_preloaded("chat"));
        assert!(!app.redispatcher.as_ref().unwrap().is_page_ready());
    }

    #[test]
    fn first_load_leaves_cues_alone() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app();
        app.launch.data_dir = Some(dir.path().to_path_buf());
        app.initialize_bridge();
        app.preload_sounds(vec!["chat".to_string()]);
        assert!(wait_for_script(&app, creates_chat));

        app.on_page_load(PageLoadState::Started);
        app.on_page_load(PageLoadState::Finished);

        assert!(!wait_for_script(&app, creates_chat));
    }
}
