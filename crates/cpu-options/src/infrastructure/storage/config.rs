//! INI-based settings persistence.
//!
//! Both plugin files live in the install directory, next to the plugin
//! binary:
//!
//! - `SC4CPUOptions.ini` – user settings, read once at startup.
//! - `SC4CPUOptions.log` – the log written by `infrastructure::logging`.
//!
//! The settings file is never written by the plugin.  A missing file is not
//! created; it simply means "no priority override" and is logged as such.

use std::path::{Path, PathBuf};

use cpu_options_core::PluginSettings;

use crate::application::configure_startup::{SettingsLoadError, SettingsRepository};
use crate::infrastructure::host::{module_directory, PathError};

/// File name of the settings file.
pub const CONFIG_FILE_NAME: &str = "SC4CPUOptions.ini";

/// File name of the log file.
pub const LOG_FILE_NAME: &str = "SC4CPUOptions.log";

// ── Paths ─────────────────────────────────────────────────────────────────────

/// Every path the plugin derives from its install directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPaths {
    pub install_dir: PathBuf,
    pub config_file: PathBuf,
    pub log_file: PathBuf,
}

impl PluginPaths {
    /// Derives the plugin paths from `install_dir`.
    pub fn in_dir(install_dir: impl Into<PathBuf>) -> Self {
        let install_dir = install_dir.into();
        Self {
            config_file: install_dir.join(CONFIG_FILE_NAME),
            log_file: install_dir.join(LOG_FILE_NAME),
            install_dir,
        }
    }

    /// Derives the plugin paths from the directory of the loaded module.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when the module directory cannot be determined.
    pub fn from_module() -> Result<Self, PathError> {
        Ok(Self::in_dir(module_directory()?))
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Reads [`PluginSettings`] from an INI file on disk.
#[derive(Debug, Clone)]
pub struct IniSettingsFile {
    path: PathBuf,
}

impl IniSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsRepository for IniSettingsFile {
    /// Loads and parses the settings file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsLoadError::Open`] for any I/O failure, including a
    /// missing file, and [`SettingsLoadError::Settings`] for malformed INI.
    fn load(&self) -> Result<PluginSettings, SettingsLoadError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| SettingsLoadError::Open {
            path: self.path.clone(),
            source,
        })?;
        Ok(PluginSettings::from_ini_str(&text)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
