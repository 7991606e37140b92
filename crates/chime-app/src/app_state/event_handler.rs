//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use chime_bridge::WebViewConfig;

use super::core::ChimeApp;
use super::init::full_bounds;
use super::types::WindowActivity;

impl ApplicationHandler for ChimeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.update_activity(|a| a.suspended = false);
            return;
        }

        if !self.initialize_window(event_loop) {
            self.shutdown();
            event_loop.exit();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.update_activity(|a| a.suspended = true);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(ref webview) = self.webview {
                        if let Err(e) = webview.set_bounds(full_bounds(size)) {
                            tracing::warn!("Failed to resize WebView: {e}");
                        }
                    }
                }
            }

            WindowEvent::Focused(focused) => self.update_activity(|a| a.focused = focused),

            WindowEvent::Occluded(occluded) => self.update_activity(|a| a.occluded = occluded),

            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_keyboard_input(event);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Back,
                ..
            } => self.request_back(),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }
}

impl ChimeApp {
    fn handle_keyboard_input(&mut self, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        if is_back_key(&event.logical_key) {
            self.request_back();
        } else if event.logical_key == Key::Named(NamedKey::F12) {
            self.open_devtools();
        }
    }

    /// Open the web inspector, if `[bridge] devtools` (or a debug build)
    /// enabled it when the page was created.
    fn open_devtools(&self) {
        if !WebViewConfig::from_bridge(&self.config.bridge).devtools {
            tracing::debug!("devtools disabled");
            return;
        }
        if let Some(ref webview) = self.webview {
            webview.open_devtools();
        }
    }

    /// Apply a window-system report and re-derive the background flag.
    pub(super) fn update_activity(&mut self, change: impl FnOnce(&mut WindowActivity)) {
        change(&mut self.activity);
        self.set_background(self.activity.in_background());
    }

    /// Record a foreground/background transition.
    pub(super) fn set_background(&self, background: bool) {
        match &self.bridge {
            Some(bridge) => bridge.set_in_background(background),
            None => {
                self.background.set_in_background(background);
            }
        }
    }

    /// Ask the page whether it handles a back press. The answer arrives
    /// while polling.
    pub(super) fn request_back(&mut self) {
        let Some(bridge) = &self.bridge else {
            return;
        };
        match bridge.back_pressed() {
            Ok(decision) => self.pending_back.push(decision),
            Err(e) => {
                tracing::warn!("Back press not delivered: {e}");
                self.back_default();
            }
        }
    }

    /// What back does when the page does not prevent it: send the window
    /// to the background.
    pub(super) fn back_default(&self) {
        if let Some(ref window) = self.window {
            tracing::debug!("Back not handled by page, minimizing");
            window.set_minimized(true);
        }
    }
}

fn is_back_key(key: &Key) -> bool {
    matches!(
        key,
        Key::Named(NamedKey::Escape | NamedKey::BrowserBack | NamedKey::GoBack)
    )
}
