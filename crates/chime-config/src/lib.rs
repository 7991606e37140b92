//! Chime configuration.
//!
//! A TOML file whose sections all default, so partial files work. The
//! binary loads it once with [`toml_loader::load_from_path`] and then
//! follows edits through [`ReloadManager`], which publishes each valid
//! revision on a `watch` channel.

pub mod reload;
pub mod schema;
pub mod toml_loader;
pub mod validation;
pub mod watcher;

pub use reload::ReloadManager;
pub use schema::{ChimeConfig, NotificationSettings, SoundConfig};
pub use watcher::ConfigWatcher;
