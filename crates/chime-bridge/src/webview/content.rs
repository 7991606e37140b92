//! Bundled UI assets served through the `chime://` protocol.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Content types for the assets the chat UI ships. Anything else is served
/// as `application/octet-stream`.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("woff2", "font/woff2"),
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/ogg"),
    ("wav", "audio/wav"),
];

/// Serves files below an asset directory.
///
/// `chime://localhost/sounds/chat.ogg` maps to `{root}/sounds/chat.ogg`;
/// an empty path maps to `index.html`.
pub struct ContentProvider {
    root: PathBuf,
}

impl ContentProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The content type and bytes for a request path, or `None` when the
    /// file is missing or lies outside the asset directory.
    pub fn resolve(&self, path: &str) -> Option<(&'static str, Cow<'static, [u8]>)> {
        let relative = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_start_matches('/');
        let relative = if relative.is_empty() { "index.html" } else { relative };

        let root = self.root.canonicalize().ok()?;
        let file = self.root.join(relative).canonicalize().ok()?;
        if !file.starts_with(&root) {
            return None;
        }
        let data = std::fs::read(&file).ok()?;
        Some((content_type(&file), Cow::Owned(data)))
    }
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let ext = match ext.as_str() {
        "htm" => "html",
        "mjs" => "js",
        "jpeg" => "jpg",
        other => other,
    };
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or("application/octet-stream", |(_, mime)| mime)
}
