//! Infrastructure layer.
//!
//! Contains the OS-facing adapters behind the application ports.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `cpu_options_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`process_control`** – OS-specific implementations of `ProcessControl`.
//!   The correct implementation is selected at compile time using
//!   `#[cfg(target_os)]`.  A `MockProcessControl` is also provided for tests.
//!
//! - **`host`** – The `HostEnvironment` built from the process's own argument
//!   list, and lookup of the directory the plugin was loaded from.
//!
//! - **`storage`** – Install-directory file paths and the INI settings file.
//!
//! - **`logging`** – The plugin's log file sink.

pub mod host;
pub mod logging;
pub mod process_control;
pub mod storage;
