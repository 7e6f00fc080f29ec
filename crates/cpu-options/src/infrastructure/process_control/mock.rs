//! Mock process control for testing.
//!
//! # Why a mock backend?
//!
//! The real backends change the affinity and priority of the *test runner
//! itself*.  Pinning `cargo test` to one core, or dropping it to idle priority,
//! would slow down every other test and could not be undone.
//!
//! The `MockProcessControl` reports a configurable pair of masks and records
//! every change request in a `Mutex<Vec<...>>` so tests can assert exactly
//! which OS calls would have been made.
//!
//! # `should_fail` flags
//!
//! Set `fail_affinity` or `fail_priority` to make the corresponding calls
//! return [`ProcessError::Os`], exercising the log-and-continue paths.

use std::sync::Mutex;

use cpu_options_core::{AffinityMask, PriorityClass};

use crate::application::configure_startup::{AffinityMasks, ProcessControl, ProcessError};

/// A backend that records calls without touching the OS.
#[derive(Debug)]
pub struct MockProcessControl {
    /// Masks returned by `affinity_masks`.
    pub masks: AffinityMasks,
    /// Every mask passed to `set_affinity_mask`.
    pub affinity_sets: Mutex<Vec<AffinityMask>>,
    /// Every class passed to `set_priority_class`.
    pub priority_sets: Mutex<Vec<PriorityClass>>,
    /// When `true`, `affinity_masks` and `set_affinity_mask` fail.
    pub fail_affinity: bool,
    /// When `true`, `set_priority_class` fails.
    pub fail_priority: bool,
}

impl Default for MockProcessControl {
    fn default() -> Self {
        Self::with_system_mask(0b1111)
    }
}

impl MockProcessControl {
    /// Creates a mock reporting a four-core system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose process and system masks are both `bits`.
    pub fn with_system_mask(bits: u64) -> Self {
        Self {
            masks: AffinityMasks {
                process: AffinityMask(bits),
                system: AffinityMask(bits),
            },
            affinity_sets: Mutex::new(Vec::new()),
            priority_sets: Mutex::new(Vec::new()),
            fail_affinity: false,
            fail_priority: false,
        }
    }

    pub fn affinity_calls(&self) -> Vec<AffinityMask> {
        self.affinity_sets.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn priority_calls(&self) -> Vec<PriorityClass> {
        self.priority_sets.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl ProcessControl for MockProcessControl {
    fn affinity_masks(&self) -> Result<AffinityMasks, ProcessError> {
        if self.fail_affinity {
            return Err(ProcessError::os("GetProcessAffinityMask", "mock failure"));
        }
        Ok(self.masks)
    }

    fn set_affinity_mask(&self, mask: AffinityMask) -> Result<(), ProcessError> {
        if self.fail_affinity {
            return Err(ProcessError::os("SetProcessAffinityMask", "mock failure"));
        }
        if let Ok(mut sets) = self.affinity_sets.lock() {
            sets.push(mask);
        }
        Ok(())
    }

    fn set_priority_class(&self, class: PriorityClass) -> Result<(), ProcessError> {
        if self.fail_priority {
            return Err(ProcessError::os("SetPriorityClass", "mock failure"));
        }
        if let Ok(mut sets) = self.priority_sets.lock() {
            sets.push(class);
        }
        Ok(())
    }
}
