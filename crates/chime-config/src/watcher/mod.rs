//! File watcher for live config reload.
//!
//! Watches the config file's directory with `notify` and signals once per
//! burst of writes.

mod config_watcher;


pub use config_watcher::ConfigWatcher;
