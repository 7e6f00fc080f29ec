//! ConfigureStartupUseCase: applies single-core affinity and a priority class
//! to the current process.
//!
//! This use case sits at the application layer and talks to the outside world
//! only through three ports:
//!
//! - [`ProcessControl`] – reads and changes the process affinity and priority.
//! - [`HostEnvironment`] – answers "is switch X on the host command line?".
//! - [`SettingsRepository`] – loads the INI settings file.
//!
//! # Decision order
//!
//! ```text
//! -CPUCount present?     yes -> leave affinity alone (log the value)
//!                        no  -> pin to lowest available core
//! -CPUPriority present?  yes -> resolve it (Low is a no-op here)
//!                        no  -> resolve [CPUOptions] Priority from the file
//! ```
//!
//! Every failure is logged and swallowed.  [`StartupConfigurator::run`] cannot
//! fail: the host must keep starting no matter what happens here.

use std::path::PathBuf;
use std::sync::Arc;

use cpu_options_core::{
    switches::{CPU_COUNT_SWITCH, CPU_PRIORITY_SWITCH},
    AffinityMask, PluginSettings, Priority, PriorityClass, PrioritySource, SettingsError,
};
use thiserror::Error;
use tracing::{debug, error, info};

/// Identifier the host uses to tell plugin directors apart.
pub const DIRECTOR_ID: u32 = 0x0C14_8B57;

// ── Ports ─────────────────────────────────────────────────────────────────────

/// Error type for process-control operations.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// An OS call returned failure.  `message` is the OS-provided text.
    #[error("{call} failed: {message}")]
    Os {
        call: &'static str,
        message: String,
    },

    /// The system mask reported no usable core.
    #[error("the system affinity mask has no available cores")]
    NoAvailableCore,

    /// The current platform has no process-control backend.
    #[error("process control is not supported on this platform")]
    Unsupported,
}

impl ProcessError {
    pub fn os(call: &'static str, message: impl Into<String>) -> Self {
        ProcessError::Os {
            call,
            message: message.into(),
        }
    }
}

/// The two masks reported by the OS for the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffinityMasks {
    /// Cores the process may currently run on.
    pub process: AffinityMask,
    /// Cores available to the process on this system.
    pub system: AffinityMask,
}

/// Platform-agnostic process control.
///
/// Each supported OS provides an implementation in the infrastructure layer.
pub trait ProcessControl: Send + Sync {
    /// Reads the current process and system affinity masks.
    fn affinity_masks(&self) -> Result<AffinityMasks, ProcessError>;

    /// Restricts the process to the cores in `mask`.
    fn set_affinity_mask(&self, mask: AffinityMask) -> Result<(), ProcessError>;

    /// Sets the process priority class.
    fn set_priority_class(&self, class: PriorityClass) -> Result<(), ProcessError>;
}

/// The narrow view of the host the plugin depends on.
pub trait HostEnvironment {
    /// Returns the value of a command-line switch, or `None` if it is absent.
    ///
    /// A switch present without a value returns `Some` of an empty string.
    fn switch_value(&self, name: &str) -> Option<String>;
}

/// Error type for loading the settings file.
#[derive(Debug, Error)]
pub enum SettingsLoadError {
    /// The file could not be opened or read.
    #[error("failed to open the settings file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The contents are malformed or lack the requested key.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Source of the persisted plugin settings.
pub trait SettingsRepository: Send + Sync {
    fn load(&self) -> Result<PluginSettings, SettingsLoadError>;
}

/// The entry point the host invokes on a loaded plugin.
pub trait PluginDirector {
    fn director_id(&self) -> u32;

    /// Runs the plugin's startup work.  Returning `false` would abort the
    /// host's startup.
    fn on_start(&self, host: &dyn HostEnvironment) -> bool;
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// What happened to the process affinity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffinityOutcome {
    /// The process was pinned to the single core in the mask.
    Restricted(AffinityMask),
    /// `-CPUCount` was present; its value is kept for the log.
    SkippedByCommandLine(String),
    /// An OS call failed; the affinity is unchanged.
    Failed,
}

/// What happened to the process priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityOutcome {
    /// The OS accepted the class.
    Applied(PriorityClass),
    /// `-CPUPriority:Low` was already applied by the host.
    AlreadyApplied,
    /// The value did not name a level; no OS call was made.
    Unrecognized,
    /// The settings file could not provide a value; no OS call was made.
    NotConfigured,
    /// The OS rejected the class.
    Failed,
}

/// Combined result of one startup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub affinity: AffinityOutcome,
    pub priority: PriorityOutcome,
}

// ── Use case ──────────────────────────────────────────────────────────────────

/// The Configure Startup use case.
pub struct StartupConfigurator {
    process: Arc<dyn ProcessControl>,
    settings: Arc<dyn SettingsRepository>,
}

impl StartupConfigurator {
    /// Creates a configurator over the given process backend and settings.
    pub fn new(process: Arc<dyn ProcessControl>, settings: Arc<dyn SettingsRepository>) -> Self {
        Self { process, settings }
    }

    /// Runs the full startup sequence once.
    pub fn run(&self, host: &dyn HostEnvironment) -> StartupReport {
        let affinity = match host.switch_value(CPU_COUNT_SWITCH) {
            Some(value) => {
                info!(
                    "Skipped forcing the game to a single CPU because the command line contains -{CPU_COUNT_SWITCH}:{value}."
                );
                AffinityOutcome::SkippedByCommandLine(value)
            }
            None => self.configure_affinity(),
        };

        let priority = match host.switch_value(CPU_PRIORITY_SWITCH) {
            Some(value) => self.resolve_priority(&value, PrioritySource::CommandLine),
            None => self.load_priority_from_settings(),
        };

        StartupReport { affinity, priority }
    }

    /// Pins the process to the lowest-numbered core in the system mask.
    ///
    /// The lowest set bit is used rather than core 0 because core 0 is not
    /// guaranteed to be in the system mask.
    pub fn configure_affinity(&self) -> AffinityOutcome {
        match self.try_configure_affinity() {
            Ok(mask) => {
                info!("Configured the game to use 1 CPU core.");
                AffinityOutcome::Restricted(mask)
            }
            Err(e) => {
                error!("An OS error occurred when configuring the game to use 1 CPU core: {e}.");
                AffinityOutcome::Failed
            }
        }
    }

    fn try_configure_affinity(&self) -> Result<AffinityMask, ProcessError> {
        let masks = self.process.affinity_masks()?;
        debug!(
            "process affinity mask {}, system affinity mask {}",
            masks.process, masks.system
        );
        let single = masks
            .system
            .lowest_set_bit()
            .ok_or(ProcessError::NoAvailableCore)?;
        self.process.set_affinity_mask(single)?;
        Ok(single)
    }

    /// Maps a priority name to a class and applies it.
    ///
    /// `raw` is matched case-insensitively.  At most one OS call is made.
    pub fn resolve_priority(&self, raw: &str, source: PrioritySource) -> PriorityOutcome {
        let priority: Priority = match raw.parse() {
            Ok(p) => p,
            Err(_) => {
                error!("Unsupported CPU priority value: {raw}");
                return PriorityOutcome::Unrecognized;
            }
        };

        let Some(class) = priority.class_for(source) else {
            info!("The game set its CPU priority to {priority}.");
            return PriorityOutcome::AlreadyApplied;
        };

        match self.process.set_priority_class(class) {
            Ok(()) => {
                info!("Set the game's CPU priority to {priority}.");
                PriorityOutcome::Applied(class)
            }
            Err(e) => {
                error!("An OS error occurred when setting the CPU priority: {e}.");
                PriorityOutcome::Failed
            }
        }
    }

    /// Reads `[CPUOptions] Priority` from the settings file and applies it.
    ///
    /// A missing file, section or key is logged and leaves the priority alone.
    pub fn load_priority_from_settings(&self) -> PriorityOutcome {
        let raw = self
            .settings
            .load()
            .and_then(|settings| Ok(settings.priority()?.to_string()));

        match raw {
            Ok(raw) => self.resolve_priority(&raw, PrioritySource::ConfigFile),
            Err(e) => {
                error!("Error when setting the CPU priority: {e}");
                PriorityOutcome::NotConfigured
            }
        }
    }
}

impl PluginDirector for StartupConfigurator {
    fn director_id(&self) -> u32 {
        DIRECTOR_ID
    }

    fn on_start(&self, host: &dyn HostEnvironment) -> bool {
        let report = self.run(host);
        debug!("startup finished: {report:?}");
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
