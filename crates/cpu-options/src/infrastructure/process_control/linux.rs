//! Linux process control via `sched_setaffinity` and `setpriority`.
//!
//! # Processes vs threads on Linux (for beginners)
//!
//! On Windows, affinity and priority class belong to the *process*.  On Linux
//! both are really per-*thread* attributes: `sched_setaffinity(0, ..)` and
//! `setpriority(PRIO_PROCESS, 0, ..)` only change the calling thread, and new
//! threads inherit from their creator.  To get the process-wide effect the
//! game expects, this backend applies every change to each thread listed in
//! `/proc/self/task`, falling back to the calling thread if that directory
//! cannot be read.
//!
//! The update is not atomic.  A thread that rejects the change (for example
//! with `EPERM`) does not stop the walk: every remaining thread is still
//! updated and the first error is reported afterwards.  A failed call may
//! therefore leave the process partly changed.
//!
//! # The "system" mask
//!
//! Linux has no separate system-wide affinity mask.  The closest equivalent is
//! the set of CPUs the process is currently allowed to use (which already
//! reflects cgroup cpusets and any inherited restriction), so both masks
//! reported by [`LinuxProcessControl::affinity_masks`] are that set.
//!
//! # Priority classes as nice values
//!
//! | Class         | nice |
//! |---------------|------|
//! | `High`        | -10  |
//! | `AboveNormal` |  -5  |
//! | `Normal`      |   0  |
//! | `BelowNormal` |   5  |
//! | `Idle`        |  19  |
//!
//! Negative nice values need `CAP_SYS_NICE` (or a suitable `RLIMIT_NICE`);
//! without it the call fails with `EACCES` and the failure is logged.

use std::io;
use std::mem;

use cpu_options_core::{AffinityMask, PriorityClass};
use tracing::debug;

use crate::application::configure_startup::{AffinityMasks, ProcessControl, ProcessError};

/// Linux implementation of [`ProcessControl`].
pub struct LinuxProcessControl;

impl LinuxProcessControl {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinuxProcessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessControl for LinuxProcessControl {
    fn affinity_masks(&self) -> Result<AffinityMasks, ProcessError> {
        let allowed = current_affinity()
            .map_err(|e| ProcessError::os("sched_getaffinity", e.to_string()))?;
        Ok(AffinityMasks {
            process: allowed,
            system: allowed,
        })
    }

    fn set_affinity_mask(&self, mask: AffinityMask) -> Result<(), ProcessError> {
        let set = to_cpu_set(mask);
        for_each_thread(thread_ids(), |tid| {
            // SAFETY: `set` is a fully initialised cpu_set_t that outlives the call.
            let rc = unsafe { libc::sched_setaffinity(tid, mem::size_of::<libc::cpu_set_t>(), &set) };
            if rc == 0 {
                Ok(())
            } else {
                Err(io::Error::last_os_error())
            }
        })
        .map_err(|e| ProcessError::os("sched_setaffinity", e.to_string()))
    }

    fn set_priority_class(&self, class: PriorityClass) -> Result<(), ProcessError> {
        let nice = nice_value(class);
        for_each_thread(thread_ids(), |tid| {
            // SAFETY: setpriority only reads its integer arguments.
            let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, tid as libc::id_t, nice) };
            if rc == 0 {
                Ok(())
            } else {
                Err(io::Error::last_os_error())
            }
        })
        .map_err(|e| ProcessError::os("setpriority", e.to_string()))
    }
}

/// Nice value used for each priority class.
pub fn nice_value(class: PriorityClass) -> libc::c_int {
    match class {
        PriorityClass::High => -10,
        PriorityClass::AboveNormal => -5,
        PriorityClass::Normal => 0,
        PriorityClass::BelowNormal => 5,
        PriorityClass::Idle => 19,
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn current_affinity() -> io::Result<AffinityMask> {
    // SAFETY: cpu_set_t is plain data; all-zero is the empty set.
    let mut set: libc::cpu_set_t = unsafe { mem::zeroed() };
    // SAFETY: `set` is a valid, writable cpu_set_t of the size passed.
    let rc = unsafe { libc::sched_getaffinity(0, mem::size_of::<libc::cpu_set_t>(), &mut set) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok((0..u64::BITS)
        // SAFETY: `core` is below CPU_SETSIZE (1024).
        .filter(|&core| unsafe { libc::CPU_ISSET(core as usize, &set) })
        .collect())
}

fn to_cpu_set(mask: AffinityMask) -> libc::cpu_set_t {
    // SAFETY: cpu_set_t is plain data; all-zero is the empty set.
    let mut set: libc::cpu_set_t = unsafe { mem::zeroed() };
    for core in mask.cores() {
        // SAFETY: `core` is below 64, well inside CPU_SETSIZE.
        unsafe { libc::CPU_SET(core as usize, &mut set) };
    }
    set
}

/// Thread ids of the current process, or `[0]` (the calling thread) when
/// `/proc/self/task` is unavailable.
fn thread_ids() -> Vec<libc::pid_t> {
    let tids: Vec<libc::pid_t> = std::fs::read_dir("/proc/self/task")
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter_map(|entry| entry.file_name().to_str()?.parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if tids.is_empty() {
        vec![0]
    } else {
        tids
    }
}

/// Applies `f` to every thread in `tids`.  Threads that exit between listing
/// and the call (`ESRCH`) are skipped; any other error is remembered and the
/// first one is returned once every thread has been visited.
fn for_each_thread<F>(tids: Vec<libc::pid_t>, mut f: F) -> io::Result<()>
where
    F: FnMut(libc::pid_t) -> io::Result<()>,
{
    let mut first_error = None;
    for tid in tids {
        match f(tid) {
            Ok(()) => {}
            Err(e) if e.raw_os_error() == Some(libc::ESRCH) => {
                debug!("thread {tid} exited before it could be updated");
            }
            Err(e) => {
                debug!("thread {tid} could not be updated: {e}");
                first_error.get_or_insert(e);
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}
