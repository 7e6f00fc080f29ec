//! # cpu-options-core
//!
//! Shared library for CPU Options containing the priority vocabulary, the
//! affinity mask arithmetic, the settings file schema, and the host
//! command-line switch parser.
//!
//! This crate has zero dependencies on OS APIs.  Everything that touches the
//! running process lives in the `cpu-options` crate.
//!
//! # What does CPU Options do? (for beginners)
//!
//! Some older games misbehave on machines with many CPU cores, or simply run
//! better when the OS scheduler gives them a higher priority.  CPU Options runs
//! once when the game starts and:
//!
//! 1. Pins the whole game process to a single logical core (unless the user
//!    passed `-CPUCount:<n>` on the game's command line).
//! 2. Sets the process priority class, either from `-CPUPriority:<level>` or
//!    from the `[CPUOptions] Priority=` entry of `SC4CPUOptions.ini`.
//!
//! This crate defines:
//!
//! - **`domain`** – The [`Priority`] names a user can type, the
//!   [`PriorityClass`] the OS understands, and the [`AffinityMask`] bitset.
//!
//! - **`settings`** – The INI settings file schema ([`PluginSettings`]).
//!
//! - **`switches`** – Parsing of `-Name:value` style command-line switches.

pub mod domain;
pub mod settings;
pub mod switches;

pub use domain::affinity::AffinityMask;
pub use domain::priority::{ParsePriorityError, Priority, PriorityClass, PrioritySource};
pub use settings::{PluginSettings, SettingsError};
pub use switches::CommandLineSwitches;
