mod app_state;
mod cli;

use std::path::PathBuf;

use chime_config::schema::ChimeConfig;
use chime_config::{toml_loader, ReloadManager};
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

const DEFAULT_LOG_DIRECTIVE: &str = "chime=info";

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("\n--- Chime crashed ---");
        eprintln!("{info}");
        eprintln!("---------------------\n");
        default_hook(info);
    }));
}

/// The config file to load: the CLI override, else the platform default.
/// A missing default file is created from the documented template.
fn resolve_config_path(args: &cli::Args) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }
    let path = toml_loader::default_config_path().ok()?;
    if !path.exists() {
        if let Err(e) = toml_loader::create_default_config(&path) {
            eprintln!("chime: could not create default config: {e}");
        }
    }
    Some(path)
}

/// `--log-level` wins, then the config file, then the built-in default.
fn log_directive(args: &cli::Args, config_path: Option<&PathBuf>) -> String {
    if let Some(level) = &args.log_level {
        return level.clone();
    }
    config_path
        .and_then(|path| toml_loader::load_from_path(path).ok())
        .map(|config| config.logging.level.directive().to_string())
        .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string())
}

fn init_logging(directive: &str) {
    let directive = directive.parse().unwrap_or_else(|e| {
        eprintln!("chime: bad log directive {directive:?}: {e}");
        tracing_subscriber::filter::Directive::from(tracing::Level::INFO)
    });
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

fn main() {
    install_panic_hook();

    let args = cli::parse();
    let config_path = resolve_config_path(&args);
    init_logging(&log_directive(&args, config_path.as_ref()));

    tracing::info!("Chime v{} starting...", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("chime-worker")
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return;
        }
    };

    // The reload manager spawns its watcher onto the runtime.
    let (config, settings) = {
        let _guard = runtime.enter();
        match config_path {
            Some(path) => {
                tracing::info!("Using config: {}", path.display());
                ReloadManager::start(path)
            }
            None => {
                tracing::warn!("No config directory available, using defaults");
                let config = ChimeConfig::default();
                // Without a sender the settings simply never change.
                let (_tx, rx) = tokio::sync::watch::channel(config.clone());
                (config, rx)
            }
        }
    };
    tracing::info!(
        notifications = config.notifications.enabled,
        sounds = config.notifications.play_sound,
        "Config loaded"
    );

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            return;
        }
    };

    let launch = app_state::LaunchOptions {
        data_dir: args.data_dir,
        url: args.url,
    };
    let mut app = app_state::ChimeApp::new(config, settings, runtime, launch);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
