//! TOML config file loading and creation.

mod loader;
mod template;


pub use loader::{create_default_config, default_config_path, load_from_path};
