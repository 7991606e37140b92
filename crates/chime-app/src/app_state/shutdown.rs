//! Graceful shutdown: tear down the bridge, the page and background work.

use std::time::Duration;

use super::core::ChimeApp;

// =============================================================================
// SHUTDOWN
// =============================================================================

impl ChimeApp {
    /// Perform graceful shutdown of all subsystems.
    ///
    /// Order matters:
    /// 1. Destroy the native bridge (release the host while the page still exists)
    /// 2. Close live notifications
    /// 3. Drop the WebView and pending page work
    /// 4. Shut down the tokio runtime (cancel timers and in-flight calls)
    /// 5. Release the window
    pub(super) fn shutdown(&mut self) {
        if self.should_exit {
            return;
        }
        self.should_exit = true;
        tracing::info!("Initiating graceful shutdown");

        // 1. Destroy the bridge before the page goes away
        if let Some(ref mut bridge) = self.bridge {
            bridge.destroy();
        }
        self.bridge = None;
        self.redispatcher = None;
        self.pending_back.clear();

        // 2. Close live notifications
        if let Some(center) = self.dispatcher.notifier() {
            center.close_all();
        }

        // 3. Drop the page
        self.webview = None;
        self.scripts.drain();

        // 4. Shut down tokio runtime
        if let Some(rt) = self.tokio_runtime.take() {
            rt.shutdown_timeout(Duration::from_secs(2));
        }

        // 5. Release the window
        self.window = None;

        tracing::info!("Graceful shutdown complete");
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::app_state::core::test_app::app;

    #[test]
    fn shutdown_on_fresh_app_does_not_panic() {
        let mut app = app();

        app.shutdown();

        assert!(app.bridge.is_none());
        assert!(app.webview.is_none());
        assert!(app.tokio_runtime.is_none());
        assert!(app.window.is_none());
        assert!(app.should_exit);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut app = app();

        app.shutdown();
        app.shutdown(); // second call must not panic

        assert!(app.tokio_runtime.is_none());
    }

    #[test]
    fn shutdown_releases_the_bridge() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app();
        app.launch.data_dir = Some(dir.path().to_path_buf());
        app.initialize_bridge();
        let client = app.bridge.as_ref().unwrap().client();
        app.scripts.push("1;".into());

        app.shutdown();

        assert!(client.is_released());
        assert!(app.redispatcher.is_none());
        assert!(app.scripts.is_empty());
    }

    #[test]
    fn work_after_shutdown_is_ignored() {
        let mut app = app();
        app.shutdown();

        app.preload_sounds(vec!["chat".into()]);
        app.handle_ipc_message(r#"{"kind":"request_permission"}"#);
        app.set_background(true);
        app.request_back();

        assert!(app.pending_back.is_empty());
    }
}
