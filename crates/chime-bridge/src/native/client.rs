use std::sync::{Arc, Mutex, PoisonError};

use chime_common::{BridgeError, ConversationKey};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{LogIndex, LogMessage, NativeCall, NativeHost};

/// Typed asynchronous access to a [`NativeHost`].
///
/// Calls run one at a time, in the order they were issued, on the
/// blocking pool so the UI loop never waits on native I/O.
pub struct NativeClient {
    host: Mutex<Option<Arc<dyn NativeHost>>>,
    turn: tokio::sync::Mutex<()>,
}

impl NativeClient {
    pub fn new(host: Arc<dyn NativeHost>) -> Self {
        Self {
            host: Mutex::new(Some(host)),
            turn: tokio::sync::Mutex::new(()),
        }
    }

    fn host(&self) -> Option<Arc<dyn NativeHost>> {
        self.host
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Invoke `call` and decode its payload.
    pub async fn call<T: DeserializeOwned>(&self, call: NativeCall) -> Result<T, BridgeError> {
        let method = call.method();
        let raw = self.invoke(call).await?;
        serde_json::from_str(&raw).map_err(|source| BridgeError::Decode { method, source })
    }

    /// Invoke `call`, decoding into untyped JSON for the page.
    pub async fn call_value(&self, call: NativeCall) -> Result<serde_json::Value, BridgeError> {
        self.call(call).await
    }

    async fn invoke(&self, call: NativeCall) -> Result<String, BridgeError> {
        let method = call.method();
        let _turn = self.turn.lock().await;
        let host = self.host().ok_or(BridgeError::Closed)?;
        debug!(method, "native call");
        tokio::task::spawn_blocking(move || host.invoke(&call))
            .await
            .map_err(|e| BridgeError::NativeCall {
                method,
                message: e.to_string(),
            })?
    }

    pub async fn list_files(&self, path: &str) -> Result<Vec<String>, BridgeError> {
        self.call(NativeCall::ListFiles { path: path.into() }).await
    }

    pub async fn list_directories(&self, path: &str) -> Result<Vec<String>, BridgeError> {
        self.call(NativeCall::ListDirectories { path: path.into() })
            .await
    }

    pub async fn init(&self, character: &str) -> Result<LogIndex, BridgeError> {
        self.call(NativeCall::Init {
            character: character.into(),
        })
        .await
    }

    pub async fn get_backlog(&self, key: &ConversationKey) -> Result<Vec<LogMessage>, BridgeError> {
        self.call(NativeCall::GetBacklog { key: key.clone() }).await
    }

    pub async fn get_logs(
        &self,
        key: &ConversationKey,
        date: NaiveDate,
    ) -> Result<Vec<LogMessage>, BridgeError> {
        self.call(NativeCall::GetLogs {
            key: key.clone(),
            date,
        })
        .await
    }

    pub async fn log_message(
        &self,
        key: &ConversationKey,
        name: &str,
        message: LogMessage,
    ) -> Result<(), BridgeError> {
        self.call(NativeCall::LogMessage {
            key: key.clone(),
            name: name.into(),
            message,
        })
        .await
    }

    pub async fn set_background(&self, enabled: bool) -> Result<(), BridgeError> {
        self.call(NativeCall::SetBackground { enabled }).await
    }

    /// Detach and release the host. Later calls fail with [`BridgeError::Closed`].
    ///
    /// Waits for an in-flight call to finish first.
    pub async fn release(&self) {
        let _turn = self.turn.lock().await;
        self.release_now();
    }

    /// Like [`release`](Self::release) for synchronous teardown paths.
    pub fn release_now(&self) {
        let host = self
            .host
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(host) = host {
            host.release();
            info!("native host released");
        }
    }

    pub fn is_released(&self) -> bool {
        self.host().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::MessageKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies with a canned string per method and tracks overlap.
    #[derive(Default)]
    struct ScriptedHost {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: Mutex<Vec<&'static str>>,
        released: AtomicUsize,
    }

    impl NativeHost for ScriptedHost {
        fn invoke(&self, call: &NativeCall) -> Result<String, BridgeError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            self.calls.lock().unwrap().push(call.method());
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match call {
                NativeCall::ListFiles { path } if path == "broken" => Ok("[1, ".into()),
                NativeCall::ListFiles { path } if path == "denied" => Err(BridgeError::NativeCall {
                    method: "listFiles",
                    message: "permission denied".into(),
                }),
                NativeCall::ListFiles { .. } => Ok(r#"["a.txt","b.txt"]"#.into()),
                NativeCall::SetBackground { .. } | NativeCall::LogMessage { .. } => {
                    Ok("null".into())
                }
                NativeCall::GetBacklog { .. } => Ok(r#"[
                    {"time":"2024-05-01T18:30:00Z","kind":"message","sender":"Alice","text":"hi"}
                ]"#
                .into()),
                NativeCall::GetLogs { key, .. } if key.as_str() == "garbled" => {
                    Ok(r#"[{"time":"yesterday"}]"#.into())
                }
                NativeCall::GetLogs { .. } => Ok(r#"[
                    {"time":"2024-05-01T09:00:00Z","kind":"action","sender":"Bob","text":"waves"},
                    {"time":"2024-05-01T09:01:00Z","kind":"roll","sender":"Bob","text":"rolls 4"}
                ]"#
                .into()),
                _ => Ok("[]".into()),
            }
        }

        fn release(&self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn results_arrive_decoded() {
        let client = NativeClient::new(Arc::new(ScriptedHost::default()));
        assert_eq!(client.list_files(".").await.unwrap(), ["a.txt", "b.txt"]);
        client.set_background(true).await.unwrap();
        assert_eq!(
            client.call_value(NativeCall::ListFiles { path: ".".into() }).await.unwrap(),
            serde_json::json!(["a.txt", "b.txt"])
        );
    }

    #[tokio::test]
    async fn logs_decode_into_messages() {
        let client = NativeClient::new(Arc::new(ScriptedHost::default()));
        let alice = ConversationKey::from("alice");

        let backlog = client.get_backlog(&alice).await.unwrap();
        assert_eq!(backlog.len(), 1);
        assert_eq!(backlog[0].sender, "Alice");
        assert_eq!(backlog[0].kind, MessageKind::Message);
        assert_eq!(backlog[0].time.to_rfc3339(), "2024-05-01T18:30:00+00:00");

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let logs = client.get_logs(&alice, date).await.unwrap();
        let kinds: Vec<_> = logs.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, [MessageKind::Action, MessageKind::Roll]);
        assert_eq!(logs[1].text, "rolls 4");

        client
            .log_message(&alice, "Alice", backlog[0].clone())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn garbled_log_is_a_decode_error() {
        let client = NativeClient::new(Arc::new(ScriptedHost::default()));
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let err = client
            .get_logs(&"garbled".into(), date)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Decode { method: "getLogs", .. }));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_decode_error() {
        let client = NativeClient::new(Arc::new(ScriptedHost::default()));
        let err = client.list_files("broken").await.unwrap_err();
        assert!(matches!(err, BridgeError::Decode { method: "listFiles", .. }));
    }

    #[tokio::test]
    async fn host_failure_reaches_the_caller() {
        let client = NativeClient::new(Arc::new(ScriptedHost::default()));
        let err = client.list_files("denied").await.unwrap_err();
        assert!(err.to_string().contains("permission denied"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_calls_are_serialized() {
        let host = Arc::new(ScriptedHost::default());
        let client = Arc::new(NativeClient::new(host.clone()));

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.list_directories(".").await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(host.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(host.calls.lock().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn released_client_is_closed() {
        let host = Arc::new(ScriptedHost::default());
        let client = NativeClient::new(host.clone());

        client.release().await;
        client.release_now();

        assert!(client.is_released());
        assert_eq!(host.released.load(Ordering::SeqCst), 1);
        assert!(matches!(
            client.list_files(".").await,
            Err(BridgeError::Closed)
        ));
    }
}
