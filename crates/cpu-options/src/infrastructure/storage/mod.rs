//! Storage infrastructure: install-directory paths and the settings file.

pub mod config;

pub use config::{IniSettingsFile, PluginPaths, CONFIG_FILE_NAME, LOG_FILE_NAME};
