//! Platform traits
//!
//! `ProcessSyscalls` is the interface between the platform-agnostic
//! operations in [`crate::ops`] and a platform backend. Each method is one
//! kernel entry point; failures carry the raw errno.

use crate::cpuset::CpuSet;
use crate::rlimit::RLimit;

/// Raw errno returned by a backend primitive
pub type Errno = i32;

/// One method per kernel entry point used for process control
pub trait ProcessSyscalls: Send + Sync {
    /// Platform name (e.g., "linux")
    fn name(&self) -> &'static str;

    /// `sysconf(_SC_CLK_TCK)`
    fn clock_ticks(&self) -> i64;

    /// `sysconf(_SC_PAGE_SIZE)`
    fn page_size(&self) -> i64;

    /// Number of online CPUs
    fn cpu_count(&self) -> usize;

    /// `getpriority(PRIO_PROCESS, pid)`
    ///
    /// Must disambiguate a niceness of -1 from failure.
    fn getpriority(&self, pid: i64) -> Result<i32, Errno>;

    /// `setpriority(PRIO_PROCESS, pid, prio)`
    fn setpriority(&self, pid: i64, prio: i32) -> Result<(), Errno>;

    /// `sched_getaffinity(pid, mask.byte_len(), mask)`
    ///
    /// Fills `mask` in place. `EINVAL` means the mask is too small.
    fn sched_getaffinity(&self, pid: i64, mask: &mut CpuSet) -> Result<(), Errno>;

    /// `sched_setaffinity(pid, mask.byte_len(), mask)`
    fn sched_setaffinity(&self, pid: i64, mask: &CpuSet) -> Result<(), Errno>;

    /// `ioprio_get(IOPRIO_WHO_PROCESS, pid)`, packed value
    fn ioprio_get(&self, pid: i64) -> Result<i32, Errno>;

    /// `ioprio_set(IOPRIO_WHO_PROCESS, pid, ioprio)`
    fn ioprio_set(&self, pid: i64, ioprio: i32) -> Result<(), Errno>;

    /// `prlimit(pid, resource, new, old)`
    ///
    /// Returns the limit in force before the call; installs `new` if given.
    fn prlimit(&self, pid: i64, resource: i32, new: Option<RLimit>) -> Result<RLimit, Errno>;
}

