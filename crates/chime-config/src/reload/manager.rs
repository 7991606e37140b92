use std::path::{Path, PathBuf};

use chime_common::ConfigError;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::schema::ChimeConfig;
use crate::toml_loader;
use crate::validation;
use crate::watcher::ConfigWatcher;

/// Keeps a [`watch`] channel of [`ChimeConfig`] in step with a file.
///
/// Receivers are the read-only settings source for alerting. A reload
/// that fails to parse or validate leaves the published value untouched,
/// and a save that changes nothing wakes no one.
pub struct ReloadManager {
    config_path: PathBuf,
    config_tx: watch::Sender<ChimeConfig>,
}

impl ReloadManager {
    /// Load the initial config from `config_path` and start watching it.
    ///
    /// Must be called from inside a tokio runtime; the watcher runs as a
    /// background task. An unreadable or missing file yields defaults.
    pub fn start(config_path: PathBuf) -> (ChimeConfig, watch::Receiver<ChimeConfig>) {
        let initial = toml_loader::load_from_path(&config_path).unwrap_or_else(|e| {
            warn!("failed to load config: {e}, using defaults");
            ChimeConfig::default()
        });

        let (config_tx, config_rx) = watch::channel(initial.clone());
        let manager = ReloadManager {
            config_path,
            config_tx,
        };
        tokio::spawn(manager.run());

        (initial, config_rx)
    }

    async fn run(self) {
        let watcher = match ConfigWatcher::new(self.config_path.clone()) {
            Ok(w) => w,
            Err(e) => {
                error!("failed to create config watcher: {e}");
                return;
            }
        };

        let (change_tx, mut change_rx) = broadcast::channel::<()>(16);
        tokio::spawn(async move {
            if let Err(e) = watcher.watch(change_tx).await {
                error!("config watcher error: {e}");
            }
        });

        loop {
            match change_rx.recv().await {
                Ok(()) => {
                    if self.config_tx.is_closed() {
                        info!("all config receivers dropped, stopping reload manager");
                        return;
                    }
                    self.apply(reload(&self.config_path));
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Missed signals collapse into one reload.
                    debug!("config watcher lagged by {n} events");
                    self.apply(reload(&self.config_path));
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("config watcher stopped");
                    return;
                }
            }
        }
    }

    fn apply(&self, result: Result<ChimeConfig, ConfigError>) {
        match result {
            Ok(config) => {
                let changed = publish(&self.config_tx, config);
                if changed {
                    info!("config reloaded from {}", self.config_path.display());
                } else {
                    debug!("config file saved without changes");
                }
            }
            Err(e) => warn!("config reload failed, keeping previous settings: {e}"),
        }
    }
}

/// Strict reload: unlike startup, an invalid file is rejected.
pub(super) fn reload(path: &Path) -> Result<ChimeConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Replace the published config if it differs. Returns whether it did.
pub(super) fn publish(tx: &watch::Sender<ChimeConfig>, config: ChimeConfig) -> bool {
    tx.send_if_modified(|current| {
        if *current == config {
            return false;
        }
        *current = config;
        true
    })
}
