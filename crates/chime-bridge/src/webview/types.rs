use chime_config::schema::BridgeConfig;

/// Configuration for creating the WebView.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// Initial URL to load.
    pub url: String,
    /// Whether to enable dev tools (always on in debug builds).
    pub devtools: bool,
    pub user_agent: Option<String>,
    /// Cues are started by the host, never by a user gesture.
    pub autoplay: bool,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self::from_bridge(&BridgeConfig::default())
    }
}

impl WebViewConfig {
    pub fn from_bridge(bridge: &BridgeConfig) -> Self {
        Self {
            url: bridge.start_url.clone(),
            devtools: bridge.devtools || cfg!(debug_assertions),
            user_agent: Some(format!("Chime/{}", env!("CARGO_PKG_VERSION"))),
            autoplay: true,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}
