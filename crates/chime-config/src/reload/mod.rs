//! Live config reload manager.
//!
//! Combines the file watcher with config loading so alert settings
//! follow the config file while the app is running.

mod manager;


pub use manager::ReloadManager;
