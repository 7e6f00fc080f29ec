//! Application layer use cases.
//!
//! # What use cases does the plugin have?
//!
//! - **`configure_startup`** – The whole startup sequence: decide whether to
//!   pin the process to one core, decide which priority class to apply, make
//!   the OS calls through an injected `ProcessControl`, and log every
//!   decision.  The command line comes from an injected `HostEnvironment` and
//!   the settings file from an injected `SettingsRepository`, so the use case
//!   never touches the OS or the file system directly.

pub mod configure_startup;
