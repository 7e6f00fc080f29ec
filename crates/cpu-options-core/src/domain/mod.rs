//! Domain entities for CPU Options.
//!
//! Pure value types with no infrastructure dependencies.  They can be compiled
//! and tested on any platform, even ones where the process-control backend is
//! unsupported.

/// Bitset of logical CPU cores.
pub mod affinity;

/// Priority names and OS priority classes.
pub mod priority;
