//! ChimeApp struct definition and constructor.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Runtime;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use winit::window::Window;

use chime_alerts::{
    AudioCuePool, BackgroundState, DesktopPresenter, NotificationCenter, NotificationDispatcher,
    NotificationRecord, SessionState,
};
use chime_bridge::{
    BackDecision, BridgeWebView, EventRedispatcher, NativeBridge, ScriptAudioBackend, ScriptQueue,
    WebViewHost,
};
use chime_common::{Event, EventBus};
use chime_config::ChimeConfig;

use super::host::BusWindow;
use super::types::{CallOutcome, LaunchOptions, WindowActivity, EVENT_BUS_CAPACITY};

/// Top-level application state.
pub struct ChimeApp {
    pub(super) config: ChimeConfig,
    pub(super) launch: LaunchOptions,
    pub(super) event_bus: EventBus,
    pub(super) bus_rx: broadcast::Receiver<Event>,

    // Alerting
    pub(super) background: Arc<BackgroundState>,
    pub(super) activity: WindowActivity,
    pub(super) session: Arc<SessionState>,
    pub(super) dispatcher: Arc<NotificationDispatcher>,
    /// Notifications the user clicked in the OS.
    pub(super) activation_rx: mpsc::UnboundedReceiver<Arc<NotificationRecord>>,

    // Scripts bound for the page (audio commands, call results)
    pub(super) scripts: ScriptQueue,
    pub(super) audio_backend: ScriptAudioBackend,
    pub(super) call_tx: mpsc::UnboundedSender<CallOutcome>,
    pub(super) call_rx: mpsc::UnboundedReceiver<CallOutcome>,

    // Windowing
    pub(super) window: Option<Arc<Window>>,
    pub(super) webview_host: WebViewHost,
    pub(super) webview: Option<BridgeWebView>,

    // Native bridge
    pub(super) bridge: Option<NativeBridge>,
    pub(super) redispatcher: Option<EventRedispatcher>,
    pub(super) pending_back: Vec<oneshot::Receiver<BackDecision>>,

    pub(super) tokio_runtime: Option<Runtime>,

    // Whether the app should exit
    pub(super) should_exit: bool,
    pub(super) last_poll: Instant,
}

impl ChimeApp {
    pub fn new(
        config: ChimeConfig,
        settings: watch::Receiver<ChimeConfig>,
        runtime: Runtime,
        launch: LaunchOptions,
    ) -> Self {
        let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
        let bus_rx = event_bus.subscribe();

        let background = Arc::new(BackgroundState::new());
        let session = Arc::new(SessionState::new(settings));

        let scripts = ScriptQueue::new();
        let audio_backend = ScriptAudioBackend::new(scripts.clone());
        let audio = Arc::new(AudioCuePool::new(
            Arc::new(audio_backend.clone()),
            session.clone(),
            config.sounds.clone(),
        ));

        let (activation_tx, activation_rx) = mpsc::unbounded_channel();
        let presenter = DesktopPresenter::default().with_activations(activation_tx);
        let notifier = NotificationCenter::with_events(Arc::new(presenter), event_bus.clone());

        let dispatcher = NotificationDispatcher::new(
            session.clone(),
            background.clone(),
            audio,
            Arc::new(BusWindow::new(event_bus.clone())),
        )
        .with_notifier(notifier);

        let (call_tx, call_rx) = mpsc::unbounded_channel();

        Self {
            config,
            launch,
            event_bus,
            bus_rx,
            background,
            activity: WindowActivity::default(),
            session,
            dispatcher: Arc::new(dispatcher),
            activation_rx,
            scripts,
            audio_backend,
            call_tx,
            call_rx,
            window: None,
            webview_host: WebViewHost::new(),
            webview: None,
            bridge: None,
            redispatcher: None,
            pending_back: Vec::new(),
            tokio_runtime: Some(runtime),
            should_exit: false,
            last_poll: Instant::now(),
        }
    }

    /// Root for files and logs: `--data-dir`, then the config, then the
    /// platform data directory.
    pub(super) fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.launch.data_dir {
            return dir.clone();
        }
        if !self.config.bridge.data_dir.is_empty() {
            return PathBuf::from(&self.config.bridge.data_dir);
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chime")
    }
}

#[cfg(test)]
pub(super) mod test_app {
    use super::*;

    pub(in crate::app_state) fn app() -> ChimeApp {
        app_with(LaunchOptions::default())
    }

    pub(in crate::app_state) fn app_with(launch: LaunchOptions) -> ChimeApp {
        let config = ChimeConfig::default();
        let (_tx, settings) = watch::channel(config.clone());
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        ChimeApp::new(config, settings, runtime, launch)
    }
}
