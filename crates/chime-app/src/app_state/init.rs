//! Window creation, native bridge and WebView setup.

use std::path::PathBuf;
use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use chime_bridge::{ContentProvider, FsNativeHost, NativeBridge, WebViewConfig};

use super::core::ChimeApp;

impl ChimeApp {
    /// Create the window, the native bridge and the chat WebView.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title("Chime")
            .with_inner_size(winit::dpi::LogicalSize::new(1024.0, 720.0))
            .with_min_inner_size(winit::dpi::LogicalSize::new(480.0, 360.0));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        self.initialize_bridge();
        self.initialize_content();

        let mut webview_config = WebViewConfig::from_bridge(&self.config.bridge);
        if let Some(url) = &self.launch.url {
            webview_config = webview_config.with_url(url.clone());
        }

        let bounds = full_bounds(window.inner_size());
        match self.webview_host.create(&*window, bounds, webview_config) {
            Ok(webview) => {
                tracing::info!(url = %webview.url(), "Chat WebView created");
                self.webview = Some(webview);
            }
            Err(e) => {
                tracing::error!("Failed to create WebView: {e}");
                return false;
            }
        }

        self.window = Some(window);
        self.preload_sounds(self.config.sounds.preload.clone());
        true
    }

    pub(super) fn initialize_bridge(&mut self) {
        let data_dir = self.data_dir();
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            tracing::warn!(path = %data_dir.display(), "Failed to create data directory: {e}");
        }

        let backlog_limit = self.config.bridge.backlog_limit as usize;
        let host = FsNativeHost::new(&data_dir, backlog_limit);
        let (bridge, redispatcher) = NativeBridge::new(Arc::new(host), self.background.clone());
        self.bridge = Some(bridge);
        self.redispatcher = Some(redispatcher);
        tracing::info!(data_dir = %data_dir.display(), "Native bridge ready");
    }

    /// Serve the bundled UI through `chime://`.
    fn initialize_content(&mut self) {
        let assets = PathBuf::from(&self.config.bridge.assets_dir);
        let assets = if assets.is_absolute() {
            assets
        } else {
            std::env::current_dir().unwrap_or_default().join(assets)
        };

        if !assets.is_dir() {
            tracing::warn!(
                path = %assets.display(),
                "Assets directory not found, the chat page will not load"
            );
        }
        self.webview_host
            .set_content_provider(ContentProvider::new(&assets));
    }

    /// Warm up audio cues in the background. The elements are created in
    /// the page once it has loaded; until then the warm-up plays wait.
    pub(super) fn preload_sounds(&self, names: Vec<String>) {
        let Some(rt) = &self.tokio_runtime else {
            return;
        };
        let dispatcher = Arc::clone(&self.dispatcher);
        rt.spawn(async move {
            dispatcher.audio().preload(&names).await;
        });
    }
}

/// Bounds filling the whole client area.
pub(super) fn full_bounds(size: PhysicalSize<u32>) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(0, 0)),
        size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(size.width, size.height)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::core::test_app::app;

    #[test]
    fn full_bounds_cover_the_window() {
        let rect = full_bounds(PhysicalSize::new(800, 600));
        assert_eq!(
            rect.position,
            wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(0, 0))
        );
        assert_eq!(
            rect.size,
            wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(800, 600))
        );
    }

    #[test]
    fn bridge_initializes_without_a_window() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app();
        app.launch.data_dir = Some(dir.path().join("data"));

        app.initialize_bridge();

        assert!(app.bridge.is_some());
        assert!(app.redispatcher.is_some());
        assert!(dir.path().join("data").is_dir());
    }
}
