//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the window, the chat WebView, the native bridge and the
//! notification dispatcher, and shuttles work between them.

mod core;
mod event_handler;
mod host;
mod init;
mod ipc_dispatch;
mod polling;
mod shutdown;
mod types;

pub use core::ChimeApp;
pub use types::LaunchOptions;
