use std::sync::{Arc, Mutex, PoisonError};

use chime_common::BridgeError;
use tracing::{debug, warn};
use wry::{raw_window_handle, WebView, WebViewBuilder};

use crate::inbound::UiEventTarget;
use crate::script::{self, INIT_SCRIPT};

use super::{WebViewConfig, WebViewHost};

impl WebViewHost {
    /// Create the WebView as a child of `window`, filling `bounds`.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
    ) -> Result<BridgeWebView, wry::Error> {
        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_devtools(config.devtools)
            .with_autoplay(config.autoplay)
            .with_initialization_script(INIT_SCRIPT);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(builder, Arc::clone(&self.events));
        builder = Self::attach_page_load_handler(builder, Arc::clone(&self.events));
        builder = Self::attach_navigation_handler(builder, Arc::clone(&self.events));
        builder = self.attach_custom_protocol(builder);
        builder = builder.with_url(&config.url);

        let webview = builder.build_as_child(window)?;
        debug!(url = %config.url, "WebView created");

        Ok(BridgeWebView {
            webview,
            url: config.url,
        })
    }
}

/// The live WebView. Lives on the UI thread.
pub struct BridgeWebView {
    webview: WebView,
    url: String,
}

impl BridgeWebView {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn evaluate_script(&self, js: &str) -> Result<(), BridgeError> {
        self.webview
            .evaluate_script(js)
            .map_err(|e| BridgeError::Script(e.to_string()))
    }

    /// Evaluate queued scripts in order. A failing script is logged and skipped.
    pub fn run_scripts(&self, scripts: Vec<String>) {
        for js in scripts {
            if let Err(e) = self.evaluate_script(&js) {
                warn!(error = %e, "queued script failed");
            }
        }
    }

    /// Settle the page promise for native call `id`.
    pub fn resolve_call(&self, id: u64, result: Result<&serde_json::Value, &str>) {
        if let Err(e) = self.evaluate_script(&script::resolve_call(id, result)) {
            warn!(id, error = %e, "failed to resolve native call");
        }
    }

    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    pub fn focus(&self) -> Result<(), wry::Error> {
        self.webview.focus()
    }

    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }
}

impl UiEventTarget for BridgeWebView {
    fn dispatch(&self, kind: &str, detail: &serde_json::Value) -> Result<(), BridgeError> {
        self.evaluate_script(&script::custom_event(kind, detail))
    }

    fn dispatch_cancelable(
        &self,
        kind: &str,
        on_result: Box<dyn FnOnce(bool) + Send>,
    ) -> Result<(), BridgeError> {
        // wry wants `Fn`; the slot makes sure the answer is delivered once.
        let slot = Mutex::new(Some(on_result));
        self.webview
            .evaluate_script_with_callback(&script::cancelable_event(kind), move |result| {
                let callback = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
                if let Some(callback) = callback {
                    callback(result.trim() == "true");
                }
            })
            .map_err(|e| BridgeError::Script(e.to_string()))
    }
}
