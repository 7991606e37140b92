use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

/// Failures of the local alert channels (audio cues, system notifications).
///
/// None of these ever reach message handling: callers log and move on.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("audio error: {0}")]
    AudioError(String),

    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    #[error("notification error: {0}")]
    NotificationError(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Failures crossing the native bridge. Surfaced to the immediate caller.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("native call {method} failed: {message}")]
    NativeCall {
        method: &'static str,
        message: String,
    },

    #[error("native call {method} returned malformed payload: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("bridge unavailable: {0}")]
    Unavailable(String),

    #[error("bridge closed")]
    Closed,

    #[error("script error: {0}")]
    Script(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ChimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("sounds.codecs is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: sounds.codecs is empty"
        );
    }

    #[test]
    fn platform_error_display() {
        let err = PlatformError::PlaybackRejected("NotAllowedError".into());
        assert_eq!(err.to_string(), "playback rejected: NotAllowedError");

        let err = PlatformError::NotSupported("windows toast".into());
        assert_eq!(err.to_string(), "not supported: windows toast");
    }

    #[test]
    fn bridge_error_display() {
        let err = BridgeError::NativeCall {
            method: "getLogs",
            message: "no such conversation".into(),
        };
        assert_eq!(
            err.to_string(),
            "native call getLogs failed: no such conversation"
        );

        let source = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err = BridgeError::Decode {
            method: "listFiles",
            source,
        };
        assert!(err.to_string().starts_with("native call listFiles returned malformed payload"));

        assert_eq!(BridgeError::Closed.to_string(), "bridge closed");
    }

    #[test]
    fn chime_error_from_bridge() {
        let err: ChimeError = BridgeError::Unavailable("NativeLogs".into()).into();
        assert!(matches!(err, ChimeError::Bridge(_)));
        assert!(err.to_string().contains("NativeLogs"));
    }

    #[test]
    fn chime_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ChimeError = io_err.into();
        assert!(matches!(err, ChimeError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn chime_error_from_config() {
        let err: ChimeError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, ChimeError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }
}
