use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::events::PageLoadState;

use super::{push_event, ContentProvider, EventSink, WebViewEvent, WebViewHost};

// =============================================================================
// NAVIGATION POLICY
// =============================================================================

/// URL prefixes the page may navigate to. Everything else is blocked.
pub const ALLOWED_NAV_PREFIXES: &[&str] = &[
    "chime://",
    // WebView2 rewrites chime://localhost/… to http://chime.localhost/…
    "http://chime.localhost/",
    "about:blank",
];

const PROFILE_HOSTS: &[&str] = &["chime.chat/c/", "www.chime.chat/c/"];

pub fn is_navigation_allowed(url: &str) -> bool {
    ALLOWED_NAV_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// The character named by a profile link such as
/// `https://chime.chat/c/Some%20Name/`, percent-decoded.
pub fn profile_from_link(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let path = PROFILE_HOSTS
        .iter()
        .find_map(|host| rest.strip_prefix(host))?;
    let raw = path.split(['/', '?', '#']).next().unwrap_or_default();
    if raw.is_empty() {
        return None;
    }
    let name = urlencoding::decode(raw).ok()?.into_owned();
    (!name.trim().is_empty()).then_some(name)
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

impl WebViewHost {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: EventSink,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();
            if serde_json::from_str::<serde_json::Value>(&body).is_err() {
                warn!(body_len = body.len(), "IPC message rejected: invalid JSON");
                return;
            }
            debug!(body_len = body.len(), "IPC message from page");
            push_event(&events, WebViewEvent::IpcMessage { body });
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: EventSink,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(?state, url = %url, "page load");
            push_event(&events, WebViewEvent::PageLoad { state, url });
        })
    }

    pub(super) fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: EventSink,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| {
            if is_navigation_allowed(&url) {
                return true;
            }
            if let Some(character) = profile_from_link(&url) {
                debug!(character = %character, "profile link intercepted");
                push_event(&events, WebViewEvent::ProfileLink { character });
            } else {
                warn!(url = %url, "navigation blocked: URL not in allowlist");
            }
            false
        })
    }

    pub(super) fn attach_custom_protocol<'a>(
        &self,
        builder: WebViewBuilder<'a>,
    ) -> WebViewBuilder<'a> {
        let Some(provider) = &self.content_provider else {
            return builder;
        };
        let cp: Arc<ContentProvider> = Arc::clone(provider);
        builder.with_custom_protocol("chime".to_string(), move |_id, request| {
            let uri = request.uri().to_string();
            let path = uri
                .strip_prefix("chime://localhost/")
                .or_else(|| uri.strip_prefix("chime://localhost"))
                .or_else(|| uri.strip_prefix("chime://"))
                .unwrap_or("");

            let response = match cp.resolve(path) {
                Some((mime, data)) => wry::http::Response::builder()
                    .status(200)
                    .header("Content-Type", mime)
                    .header("Access-Control-Allow-Origin", "chime://localhost")
                    .body(Cow::from(data.into_owned())),
                None => {
                    warn!(path = %path, "custom protocol: asset not found");
                    wry::http::Response::builder()
                        .status(404)
                        .body(Cow::from(b"Not Found".to_vec()))
                }
            };
            response.unwrap_or_else(|e| {
                warn!(error = %e, "custom protocol: bad response");
                wry::http::Response::new(Cow::from(Vec::new()))
            })
        })
    }
}
