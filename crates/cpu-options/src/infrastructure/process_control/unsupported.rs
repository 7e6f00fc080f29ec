//! Fallback for targets without a process-control backend.
//!
//! Every call fails with [`ProcessError::Unsupported`], which the use case
//! logs like any other OS failure.

use cpu_options_core::{AffinityMask, PriorityClass};

use crate::application::configure_startup::{AffinityMasks, ProcessControl, ProcessError};

pub struct UnsupportedProcessControl;

impl ProcessControl for UnsupportedProcessControl {
    fn affinity_masks(&self) -> Result<AffinityMasks, ProcessError> {
        Err(ProcessError::Unsupported)
    }

    fn set_affinity_mask(&self, _mask: AffinityMask) -> Result<(), ProcessError> {
        Err(ProcessError::Unsupported)
    }

    fn set_priority_class(&self, _class: PriorityClass) -> Result<(), ProcessError> {
        Err(ProcessError::Unsupported)
    }
}
