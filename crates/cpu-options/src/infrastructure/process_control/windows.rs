//! Windows process control via the Win32 threading API.
//!
//! Uses `GetProcessAffinityMask`, `SetProcessAffinityMask` and
//! `SetPriorityClass` on the current-process pseudo handle.  Masks are
//! pointer-sized on Windows; on 32-bit targets only the low 32 bits of an
//! [`AffinityMask`] are meaningful.

#![cfg(target_os = "windows")]

use cpu_options_core::{AffinityMask, PriorityClass};
use windows::Win32::System::Threading::{
    GetCurrentProcess, GetProcessAffinityMask, SetPriorityClass, SetProcessAffinityMask,
    ABOVE_NORMAL_PRIORITY_CLASS, BELOW_NORMAL_PRIORITY_CLASS, HIGH_PRIORITY_CLASS,
    IDLE_PRIORITY_CLASS, NORMAL_PRIORITY_CLASS, PROCESS_CREATION_FLAGS,
};

use crate::application::configure_startup::{AffinityMasks, ProcessControl, ProcessError};

/// Windows implementation of [`ProcessControl`].
pub struct WindowsProcessControl;

impl WindowsProcessControl {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsProcessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessControl for WindowsProcessControl {
    fn affinity_masks(&self) -> Result<AffinityMasks, ProcessError> {
        let mut process: usize = 0;
        let mut system: usize = 0;
        // SAFETY: GetCurrentProcess returns a pseudo handle that needs no
        // closing; both out-pointers reference live stack locals.
        unsafe { GetProcessAffinityMask(GetCurrentProcess(), &mut process, &mut system) }
            .map_err(|e| ProcessError::os("GetProcessAffinityMask", e.to_string()))?;
        Ok(AffinityMasks {
            process: AffinityMask(process as u64),
            system: AffinityMask(system as u64),
        })
    }

    fn set_affinity_mask(&self, mask: AffinityMask) -> Result<(), ProcessError> {
        // SAFETY: pseudo handle for the current process; the mask is a plain integer.
        unsafe { SetProcessAffinityMask(GetCurrentProcess(), mask.bits() as usize) }
            .map_err(|e| ProcessError::os("SetProcessAffinityMask", e.to_string()))
    }

    fn set_priority_class(&self, class: PriorityClass) -> Result<(), ProcessError> {
        // SAFETY: pseudo handle for the current process; the class is a valid constant.
        unsafe { SetPriorityClass(GetCurrentProcess(), win32_priority_class(class)) }
            .map_err(|e| ProcessError::os("SetPriorityClass", e.to_string()))
    }
}

fn win32_priority_class(class: PriorityClass) -> PROCESS_CREATION_FLAGS {
    match class {
        PriorityClass::High => HIGH_PRIORITY_CLASS,
        PriorityClass::AboveNormal => ABOVE_NORMAL_PRIORITY_CLASS,
        PriorityClass::Normal => NORMAL_PRIORITY_CLASS,
        PriorityClass::BelowNormal => BELOW_NORMAL_PRIORITY_CLASS,
        PriorityClass::Idle => IDLE_PRIORITY_CLASS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_classes_map_to_documented_win32_values() {
        assert_eq!(win32_priority_class(PriorityClass::High).0, 0x0000_0080);
        assert_eq!(win32_priority_class(PriorityClass::AboveNormal).0, 0x0000_8000);
        assert_eq!(win32_priority_class(PriorityClass::Normal).0, 0x0000_0020);
        assert_eq!(win32_priority_class(PriorityClass::BelowNormal).0, 0x0000_4000);
        assert_eq!(win32_priority_class(PriorityClass::Idle).0, 0x0000_0040);
    }

    #[test]
    fn test_affinity_masks_reports_non_empty_system_mask() {
        let masks = WindowsProcessControl::new().affinity_masks().unwrap();
        assert!(!masks.system.is_empty());
        assert_eq!(masks.process.bits() & !masks.system.bits(), 0);
    }
}
