//! JavaScript run inside the page.
//!
//! Every value spliced into a script goes through `serde_json`, so
//! user-controlled strings can never break out of their literal.

use chime_alerts::AudioSource;
use serde::Serialize;

/// Installed before any page script runs.
///
/// Exposes `window.chime.send`, promise-returning `window.chime.native.*`
/// wrappers and the audio element helpers the host drives.
pub const INIT_SCRIPT: &str = r#"
(function() {
    if (window.chime) return;
    var seq = 0;
    var pending = {};

    function send(kind, payload) {
        window.ipc.postMessage(JSON.stringify({
            kind: kind,
            payload: payload === undefined ? null : payload
        }));
    }

    function call(method, args) {
        return new Promise(function(resolve, reject) {
            var id = ++seq;
            pending[id] = { resolve: resolve, reject: reject };
            send('native_call', { id: id, call: { method: method, args: args } });
        });
    }

    function player(name) {
        return document.getElementById('soundplayer-' + name);
    }

    window.chime = {
        send: send,
        native: {
            listFiles: function(path) { return call('listFiles', { path: path }); },
            listDirectories: function(path) { return call('listDirectories', { path: path }); },
            init: function(character) { return call('init', { character: character }); },
            getBacklog: function(key) { return call('getBacklog', { key: key }); },
            getLogs: function(key, date) { return call('getLogs', { key: key, date: date }); },
            logMessage: function(key, name, message) {
                return call('logMessage', { key: key, name: name, message: message });
            },
            setBackground: function(enabled) { return call('setBackground', { enabled: enabled }); }
        },
        _resolve: function(id, ok, value) {
            var p = pending[id];
            if (!p) return;
            delete pending[id];
            if (ok) p.resolve(value); else p.reject(new Error(value));
        },
        audio: {
            create: function(name, sources) {
                if (player(name) !== null) return;
                var el = document.createElement('audio');
                el.preload = 'auto';
                el.id = 'soundplayer-' + name;
                sources.forEach(function(s) {
                    var src = document.createElement('source');
                    src.type = s.mime;
                    src.src = s.src;
                    el.appendChild(src);
                });
                document.body.appendChild(el);
            },
            set: function(name, props) {
                var el = player(name);
                if (el !== null) Object.assign(el, props);
            },
            play: function(name, id) {
                function report(ok, error) {
                    send('audio_result', { id: id, ok: ok, error: error || null });
                }
                var el = player(name);
                if (el === null) return report(false, 'no audio element for ' + name);
                try {
                    var p = el.play();
                    if (p instanceof Promise) {
                        p.then(function() { report(true); }, function(e) { report(false, String(e)); });
                    } else {
                        report(true);
                    }
                } catch (e) {
                    report(false, String(e));
                }
            }
        }
    };
})();
"#;

fn js<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Dispatch `new CustomEvent(kind, {detail})` on `document`.
pub fn custom_event(kind: &str, detail: &serde_json::Value) -> String {
    format!(
        "document.dispatchEvent(new CustomEvent({}, {{ detail: {} }}));",
        js(kind),
        js(detail)
    )
}

/// Dispatch a cancelable event. The script evaluates to `defaultPrevented`.
pub fn cancelable_event(kind: &str) -> String {
    format!(
        "(function() {{ var e = new Event({}, {{ cancelable: true }}); \
         document.dispatchEvent(e); return e.defaultPrevented; }})()",
        js(kind)
    )
}

/// Settle the page-side promise of native call `id`.
pub fn resolve_call(id: u64, result: Result<&serde_json::Value, &str>) -> String {
    match result {
        Ok(value) => format!("window.chime._resolve({id}, true, {});", js(value)),
        Err(message) => format!("window.chime._resolve({id}, false, {});", js(message)),
    }
}

pub fn audio_create(name: &str, sources: &[AudioSource]) -> String {
    format!("window.chime.audio.create({}, {});", js(name), js(sources))
}

pub fn audio_set(name: &str, props: &serde_json::Value) -> String {
    format!("window.chime.audio.set({}, {});", js(name), js(props))
}

pub fn audio_play(name: &str, request: u64) -> String {
    format!("window.chime.audio.play({}, {request});", js(name))
}
