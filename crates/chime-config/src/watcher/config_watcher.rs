use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chime_common::ConfigError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

/// Editors often save via write + rename; coalesce bursts within this window.
pub(super) const DEBOUNCE: Duration = Duration::from_millis(500);

/// Watches one config file and signals after each burst of changes.
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(path = %path.display(), "config file does not exist yet, watching for creation");
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory is watched rather than the file, so a file replaced
    /// by rename keeps being observed.
    fn watch_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Send `()` on `tx` once per debounced burst of changes.
    ///
    /// Runs until the underlying notify channel closes.
    pub async fn watch(&self, tx: broadcast::Sender<()>) -> Result<(), ConfigError> {
        let dir = self.watch_dir();
        let file_name = self.path.file_name().map(OsString::from).unwrap_or_default();
        let (raw_tx, mut raw_rx) = mpsc::channel::<()>(16);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) if touches(&event, &file_name) => {
                    // A full channel already guarantees a pending signal.
                    let _ = raw_tx.try_send(());
                }
                Ok(_) => {}
                Err(e) => error!("file watcher error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| ConfigError::WatchError(format!("failed to create watcher: {e}")))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatchError(format!("failed to watch {}: {e}", dir.display())))?;
        info!(path = %self.path.display(), "watching config file");

        while settle(&mut raw_rx, DEBOUNCE).await {
            debug!("config file changed");
            if tx.send(()).is_err() {
                debug!("no receivers for config reload signal");
            }
        }

        drop(watcher);
        Ok(())
    }
}

/// Whether `event` modifies or creates the file named `file_name`.
fn touches(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

/// Wait for a signal, then until `quiet` passes without another.
///
/// Returns `false` once the channel is closed.
pub(super) async fn settle(rx: &mut mpsc::Receiver<()>, quiet: Duration) -> bool {
    if rx.recv().await.is_none() {
        return false;
    }
    loop {
        match tokio::time::timeout(quiet, rx.recv()).await {
            Err(_) => return true,
            Ok(Some(())) => continue,
            Ok(None) => return false,
        }
    }
}

#[cfg(test)]
pub(super) fn touches_for_test(event: &Event, file_name: &str) -> bool {
    touches(event, &OsString::from(file_name))
}
