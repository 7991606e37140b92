//! Native host / WebView bridge configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Page loaded into the WebView at startup.
    pub start_url: String,
    /// Directory served through the `chime://` protocol.
    pub assets_dir: String,
    /// Root for files and logs. Empty means the platform data directory.
    pub data_dir: String,
    /// Messages returned by `getBacklog` (valid range: 1-10000).
    pub backlog_limit: u32,
    /// Enable WebView devtools (always on in debug builds).
    pub devtools: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            start_url: "chime://localhost/index.html".into(),
            assets_dir: "assets".into(),
            data_dir: String::new(),
            backlog_limit: 100,
            devtools: false,
        }
    }
}
