//! Platform-specific process control implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`; [`platform_process_control`] returns it.

use std::sync::Arc;

use crate::application::configure_startup::ProcessControl;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub mod unsupported;

/// Returns the process-control backend for the compile target.
pub fn platform_process_control() -> Arc<dyn ProcessControl> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsProcessControl::new())
    }

    #[cfg(target_os = "linux")]
    {
        Arc::new(linux::LinuxProcessControl::new())
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    {
        Arc::new(unsupported::UnsupportedProcessControl)
    }
}
