//! Configuration loading
//!
//! Environment variables first, then a JSON or TOML file.

pub mod loader;

pub use loader::{load_from_env, load_from_file, load_with_path, probe_config_paths};
