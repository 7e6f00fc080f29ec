//! Priority names and OS priority classes.
//!
//! Users name a priority level with a short word such as `High` or
//! `BelowNormal`.  That word is parsed into a [`Priority`], and then mapped to
//! the [`PriorityClass`] that is actually handed to the OS.
//!
//! # Why two enums? (for beginners)
//!
//! The mapping is not one-to-one.  `Low` is an alias of `Idle`, except when it
//! comes from the game's own `-CPUPriority:Low` switch: the game has already
//! lowered its priority by the time the plugin runs, so repeating the call
//! would be pointless.  Keeping the *name* separate from the *class* lets
//! [`Priority::class_for`] express that rule in one place.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Returned when a string does not name a known priority level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported CPU priority value: {0}")]
pub struct ParsePriorityError(pub String);

/// Where a priority value was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrioritySource {
    /// The host's `-CPUPriority:<value>` switch.
    CommandLine,
    /// The `[CPUOptions] Priority=` entry of the settings file.
    ConfigFile,
}

/// A priority level as written by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    AboveNormal,
    Normal,
    BelowNormal,
    Idle,
    Low,
}

/// The process priority class applied by the OS.
///
/// Ordered from most to least favourable for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriorityClass {
    High,
    AboveNormal,
    Normal,
    BelowNormal,
    Idle,
}

impl Priority {
    /// Every level, in the order they are matched.
    pub const ALL: [Priority; 6] = [
        Priority::High,
        Priority::AboveNormal,
        Priority::Normal,
        Priority::BelowNormal,
        Priority::Idle,
        Priority::Low,
    ];

    /// Canonical spelling used in logs and the settings file.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::AboveNormal => "AboveNormal",
            Priority::Normal => "Normal",
            Priority::BelowNormal => "BelowNormal",
            Priority::Idle => "Idle",
            Priority::Low => "Low",
        }
    }

    /// Maps this level to the class that should be applied, or `None` when
    /// no OS call is needed.
    ///
    /// `Low` from the command line returns `None`: the host applies it itself
    /// before any plugin is loaded.  `Low` from the settings file is an alias
    /// of [`PriorityClass::Idle`].
    pub fn class_for(self, source: PrioritySource) -> Option<PriorityClass> {
        match self {
            Priority::High => Some(PriorityClass::High),
            Priority::AboveNormal => Some(PriorityClass::AboveNormal),
            Priority::Normal => Some(PriorityClass::Normal),
            Priority::BelowNormal => Some(PriorityClass::BelowNormal),
            Priority::Idle => Some(PriorityClass::Idle),
            Priority::Low => match source {
                PrioritySource::CommandLine => None,
                PrioritySource::ConfigFile => Some(PriorityClass::Idle),
            },
        }
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    /// Case-insensitive, whole-string match.  Surrounding whitespace is not
    /// trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParsePriorityError(s.to_string()))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PriorityClass {
    pub fn as_str(self) -> &'static str {
        match self {
            PriorityClass::High => "High",
            PriorityClass::AboveNormal => "AboveNormal",
            PriorityClass::Normal => "Normal",
            PriorityClass::BelowNormal => "BelowNormal",
            PriorityClass::Idle => "Idle",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
