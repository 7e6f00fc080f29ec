//! Settings file schema.
//!
//! The settings file is a plain INI file that sits next to the plugin:
//!
//! ```ini
//! [CPUOptions]
//! Priority=AboveNormal
//! ```
//!
//! Only one key is recognised.  Unknown sections and keys are ignored so that
//! users can keep comments or notes in the file without breaking anything.
//!
//! Values are taken literally: quotes and backslashes are not interpreted, so
//! `Priority="High"` yields the text `"High"` (quotes included), which is then
//! rejected as an unsupported level.  Giving `Priority` more than once is an
//! error rather than a silent first-or-last pick.
//!
//! This module only deals with text.  Opening the file on disk is done by the
//! storage adapter in the `cpu-options` crate.

use ini::{Ini, ParseOption};
use thiserror::Error;

/// Section holding the plugin's settings.
pub const SECTION: &str = "CPUOptions";

/// Key holding the priority level name.
pub const PRIORITY_KEY: &str = "Priority";

/// Errors produced while reading the settings text.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The text is not valid INI.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ini::ParseError),

    /// The requested section or key is absent.
    #[error("no such setting: {section}.{key}")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    /// The key is given more than once.
    #[error("duplicate setting: {section}.{key}")]
    DuplicateKey {
        section: &'static str,
        key: &'static str,
    },
}

/// Parsed contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginSettings {
    /// Raw value of `[CPUOptions] Priority`, if present.
    ///
    /// Kept as text: deciding whether the value is a valid level, and logging
    /// it when it is not, is the caller's job.
    pub priority: Option<String>,
}

impl PluginSettings {
    /// Parses settings from INI text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] if the text is malformed and
    /// [`SettingsError::DuplicateKey`] if `Priority` appears more than once.
    /// A missing section or key is not an error here; see
    /// [`PluginSettings::priority`].
    pub fn from_ini_str(text: &str) -> Result<Self, SettingsError> {
        let ini = Ini::load_from_str_opt(text, literal_values())?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, SettingsError> {
        let mut values = ini
            .section_all(Some(SECTION))
            .flat_map(|props| props.get_all(PRIORITY_KEY));
        let priority = values.next().map(str::to_string);
        if values.next().is_some() {
            return Err(SettingsError::DuplicateKey {
                section: SECTION,
                key: PRIORITY_KEY,
            });
        }
        Ok(Self { priority })
    }

    /// Returns the raw priority value.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingKey`] when the section or key is absent.
    pub fn priority(&self) -> Result<&str, SettingsError> {
        self.priority.as_deref().ok_or(SettingsError::MissingKey {
            section: SECTION,
            key: PRIORITY_KEY,
        })
    }
}

fn literal_values() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
