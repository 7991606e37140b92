//! Native -> page event delivery.
//!
//! A single [`BridgeSender`] feeds an unbounded channel; the UI thread
//! drains it through [`EventRedispatcher::pump`]. Nothing is dispatched
//! until the page has finished loading, so events raised during startup
//! wait in the channel instead of being lost. Each event is taken off the
//! channel once and dispatched once, in send order.

use chime_common::BridgeError;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::{BackDecision, BridgeEvent, PageLoadState};

/// Where redispatched events land: the page's `document`.
pub trait UiEventTarget {
    /// Dispatch a `CustomEvent` carrying `detail`.
    fn dispatch(&self, kind: &str, detail: &serde_json::Value) -> Result<(), BridgeError>;

    /// Dispatch a cancelable `Event`; `on_result` receives `defaultPrevented`.
    ///
    /// If the result never arrives `on_result` is dropped uncalled.
    fn dispatch_cancelable(
        &self,
        kind: &str,
        on_result: Box<dyn FnOnce(bool) + Send>,
    ) -> Result<(), BridgeError>;
}

/// The only producer of bridge events. Deliberately not `Clone`.
#[derive(Debug)]
pub struct BridgeSender {
    tx: mpsc::UnboundedSender<BridgeEvent>,
}

impl BridgeSender {
    pub fn send(&self, event: BridgeEvent) -> Result<(), BridgeError> {
        self.tx.send(event).map_err(|_| BridgeError::Closed)
    }
}

/// Consumer side, owned by the UI thread.
#[derive(Debug)]
pub struct EventRedispatcher {
    rx: mpsc::UnboundedReceiver<BridgeEvent>,
    page_ready: bool,
}

/// Create a connected sender/redispatcher pair.
pub fn channel() -> (BridgeSender, EventRedispatcher) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        BridgeSender { tx },
        EventRedispatcher {
            rx,
            page_ready: false,
        },
    )
}

impl EventRedispatcher {
    /// Track page lifecycle. A new navigation holds delivery until it finishes.
    pub fn on_page_load(&mut self, state: PageLoadState) {
        self.page_ready = state == PageLoadState::Finished;
        debug!(?state, "bridge page state");
    }

    pub fn is_page_ready(&self) -> bool {
        self.page_ready
    }

    /// Deliver every queued event to `target`. Returns how many were dispatched.
    pub fn pump(&mut self, target: &dyn UiEventTarget) -> usize {
        if !self.page_ready {
            return 0;
        }
        let mut delivered = 0;
        while let Ok(event) = self.rx.try_recv() {
            let kind = event.dom_type();
            let result = match event {
                BridgeEvent::OpenProfile { character } => target.dispatch(kind, &json!(character)),
                BridgeEvent::NotificationClicked { data } => {
                    target.dispatch(kind, &json!({ "data": data }))
                }
                BridgeEvent::LifecycleChanged { background } => {
                    target.dispatch(kind, &json!({ "background": background }))
                }
                BridgeEvent::BackPressed(responder) => target.dispatch_cancelable(
                    kind,
                    Box::new(move |prevented| {
                        let decision = if prevented {
                            BackDecision::Prevented
                        } else {
                            BackDecision::Default
                        };
                        let _ = responder.send(decision);
                    }),
                ),
            };
            match result {
                Ok(()) => {
                    delivered += 1;
                    debug!(kind, "bridge event dispatched");
                }
                Err(e) => warn!(kind, error = %e, "bridge event dropped"),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct RecordingTarget {
        dispatched: RefCell<Vec<(String, serde_json::Value)>>,
        prevent_back: bool,
        broken: bool,
    }

    impl UiEventTarget for RecordingTarget {
        fn dispatch(&self, kind: &str, detail: &serde_json::Value) -> Result<(), BridgeError> {
            if self.broken {
                return Err(BridgeError::Script("webview gone".into()));
            }
            self.dispatched
                .borrow_mut()
                .push((kind.to_string(), detail.clone()));
            Ok(())
        }

        fn dispatch_cancelable(
            &self,
            kind: &str,
            on_result: Box<dyn FnOnce(bool) + Send>,
        ) -> Result<(), BridgeError> {
            if self.broken {
                return Err(BridgeError::Script("webview gone".into()));
            }
            self.dispatched
                .borrow_mut()
                .push((kind.to_string(), serde_json::Value::Null));
            on_result(self.prevent_back);
            Ok(())
        }
    }

    fn kinds(target: &RecordingTarget) -> Vec<String> {
        target
            .dispatched
            .borrow()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    #[test]
    fn events_before_load_are_buffered_in_order() {
        let (tx, mut redispatcher) = channel();
        let target = RecordingTarget::default();

        tx.send(BridgeEvent::OpenProfile {
            character: "Alice".into(),
        })
        .unwrap();
        tx.send(BridgeEvent::NotificationClicked {
            data: json!("bob"),
        })
        .unwrap();

        assert_eq!(redispatcher.pump(&target), 0);
        redispatcher.on_page_load(PageLoadState::Started);
        assert_eq!(redispatcher.pump(&target), 0);

        redispatcher.on_page_load(PageLoadState::Finished);
        assert_eq!(redispatcher.pump(&target), 2);
        assert_eq!(kinds(&target), ["open-profile", "notification-clicked"]);
        assert_eq!(target.dispatched.borrow()[0].1, json!("Alice"));
        assert_eq!(target.dispatched.borrow()[1].1, json!({"data": "bob"}));
    }

    #[test]
    fn each_event_is_delivered_once() {
        let (tx, mut redispatcher) = channel();
        let target = RecordingTarget::default();
        redispatcher.on_page_load(PageLoadState::Finished);

        tx.send(BridgeEvent::LifecycleChanged { background: true })
            .unwrap();
        assert_eq!(redispatcher.pump(&target), 1);
        assert_eq!(redispatcher.pump(&target), 0);
        assert_eq!(
            target.dispatched.borrow().as_slice(),
            [("lifecycle-changed".to_string(), json!({"background": true}))]
        );
    }

    #[test]
    fn renavigation_holds_delivery() {
        let (tx, mut redispatcher) = channel();
        let target = RecordingTarget::default();
        redispatcher.on_page_load(PageLoadState::Finished);
        redispatcher.on_page_load(PageLoadState::Started);

        tx.send(BridgeEvent::OpenProfile {
            character: "Carol".into(),
        })
        .unwrap();
        assert_eq!(redispatcher.pump(&target), 0);

        redispatcher.on_page_load(PageLoadState::Finished);
        assert_eq!(redispatcher.pump(&target), 1);
    }

    #[test]
    fn prevented_back_reports_prevented() {
        let (tx, mut redispatcher) = channel();
        let target = RecordingTarget {
            prevent_back: true,
            ..Default::default()
        };
        redispatcher.on_page_load(PageLoadState::Finished);

        let (respond, mut decision) = oneshot::channel();
        tx.send(BridgeEvent::BackPressed(respond)).unwrap();
        redispatcher.pump(&target);

        assert_eq!(decision.try_recv().unwrap(), BackDecision::Prevented);
        assert_eq!(kinds(&target), ["backbutton"]);
    }

    #[test]
    fn unhandled_back_allows_default() {
        let (tx, mut redispatcher) = channel();
        let target = RecordingTarget::default();
        redispatcher.on_page_load(PageLoadState::Finished);

        let (respond, mut decision) = oneshot::channel();
        tx.send(BridgeEvent::BackPressed(respond)).unwrap();
        redispatcher.pump(&target);

        assert_eq!(decision.try_recv().unwrap(), BackDecision::Default);
    }

    #[test]
    fn failed_dispatch_is_dropped_not_retried() {
        let (tx, mut redispatcher) = channel();
        let broken = RecordingTarget {
            broken: true,
            ..Default::default()
        };
        redispatcher.on_page_load(PageLoadState::Finished);

        let (respond, mut decision) = oneshot::channel();
        tx.send(BridgeEvent::BackPressed(respond)).unwrap();
        assert_eq!(redispatcher.pump(&broken), 0);
        assert!(decision.try_recv().is_err());

        let healthy = RecordingTarget::default();
        assert_eq!(redispatcher.pump(&healthy), 0);
    }

    #[test]
    fn send_after_consumer_dropped_is_closed() {
        let (tx, redispatcher) = channel();
        drop(redispatcher);
        assert!(matches!(
            tx.send(BridgeEvent::LifecycleChanged { background: false }),
            Err(BridgeError::Closed)
        ));
    }
}
