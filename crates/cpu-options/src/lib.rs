//! cpu-options library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the launcher binary in `main.rs` share the same module tree.
//!
//! # What does cpu-options do? (for beginners)
//!
//! The plugin is loaded into a game process and runs exactly once, when the
//! host calls its director's `on_start`.  It then:
//!
//! 1. Finds its install directory and opens `SC4CPUOptions.log` there.
//! 2. Pins the game to the lowest-numbered available CPU core, unless the
//!    game was started with `-CPUCount:<n>`.
//! 3. Sets the game's priority class from `-CPUPriority:<level>`, or, when
//!    that switch is absent, from `[CPUOptions] Priority=` in
//!    `SC4CPUOptions.ini`.
//!
//! Nothing here can stop the game from starting: every failure is written to
//! the log and then ignored.

/// Application layer: the startup use case and its ports.
pub mod application;

/// Infrastructure layer: OS adapters, settings file, and logging.
pub mod infrastructure;

/// Composition root: wires the use case to the real adapters.
pub mod plugin;

pub use application::configure_startup::{
    HostEnvironment, PluginDirector, StartupConfigurator, StartupReport, DIRECTOR_ID,
};
pub use plugin::CpuOptionsPlugin;
