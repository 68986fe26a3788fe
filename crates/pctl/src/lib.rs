//! # pctl - Linux process control
//!
//! Thin, synchronous wrappers over the Linux process-control syscalls:
//! CPU affinity, I/O priority, scheduling niceness, resource limits and the
//! clock-tick / page-size constants.
//!
//! ## Surfaces
//!
//! - Free functions (`get_cpu_affinity`, `set_rlimit`, ...): one syscall
//!   each, errno passed through in [`SysError::Os`].
//! - [`Process`]: a pid handle that also checks arguments (niceness range,
//!   I/O class/level, CPU indices, pid 0 for limits) before calling in.
//! - [`ffi`]: `extern "C"` functions with integer status codes for host
//!   language runtimes (feature `ffi`, on by default).
//!
//! ## Quick Start
//!
//! ```ignore
//! use pctl::{Process, IoClass, Resource};
//!
//! let me = Process::current();
//! println!("allowed CPUs: {:?}", me.cpu_affinity()?);
//! me.set_cpu_affinity(&[0, 2])?;
//! me.set_ionice(IoClass::BestEffort, Some(7))?;
//! let nofile = me.rlimit(Resource::Nofile)?;
//! println!("open files: soft={} hard={}", nofile.soft, nofile.hard);
//! ```
//!
//! ## Environment Variables
//!
//! - `PCTL_LOG_LEVEL` / `PCTL_FLUSH_EPRINT` - logging (see `pctl_core::plog`)
//! - `PCTL_AFFINITY_START_CPUS` / `PCTL_AFFINITY_MAX_CPUS` /
//!   `PCTL_AFFINITY_FIXED` - affinity mask growth (read once)

use std::sync::OnceLock;

use pctl_core::ops;

pub mod process;
#[cfg(feature = "ffi")]
pub mod ffi;

// Re-exports
pub use pctl_core::{
    check_nice, status_of, AffinityStrategy, CpuSet, IoClass, IoPriority, LogLevel, RLimit,
    Resource, SysError, SysResult, NICE_MAX, NICE_MIN, RLIM_INFINITY, STATUS_AFFINITY_OVERFLOW,
    STATUS_NO_RESULT,
};
pub use pctl_core::{pdebug, perror, pinfo, plog, ptrace, pwarn, set_log_level};
pub use pctl_linux::{AffinityConfig, LinuxSyscalls};
pub use process::Process;

static BACKEND: LinuxSyscalls = LinuxSyscalls;
static AFFINITY_STRATEGY: OnceLock<AffinityStrategy> = OnceLock::new();

/// The Linux backend shared by the free functions
#[inline]
pub fn backend() -> &'static LinuxSyscalls {
    &BACKEND
}

/// Affinity growth policy, read from the environment on first use
pub fn affinity_strategy() -> AffinityStrategy {
    *AFFINITY_STRATEGY.get_or_init(|| AffinityConfig::from_env().strategy())
}

// ============================================================================
// Free functions
// ============================================================================

/// Clock ticks per second (`sysconf(_SC_CLK_TCK)`)
pub fn get_clock_ticks() -> i64 {
    ops::get_clock_ticks(backend())
}

/// Page size in bytes (`sysconf(_SC_PAGE_SIZE)`)
pub fn get_page_size() -> i64 {
    ops::get_page_size(backend())
}

/// Online CPUs
pub fn get_cpu_count() -> usize {
    use pctl_core::ProcessSyscalls;
    backend().cpu_count()
}

/// Scheduling niceness of `pid`
pub fn get_priority(pid: i64) -> SysResult<i32> {
    ops::get_priority(backend(), pid)
}

pub fn set_priority(pid: i64, priority: i32) -> SysResult<()> {
    ops::set_priority(backend(), pid, priority)
}

/// CPUs `pid` may run on, ascending
///
/// A negative pid yields [`SysError::NoResult`] without a syscall.
pub fn get_cpu_affinity(pid: i64) -> SysResult<Vec<usize>> {
    ops::get_cpu_affinity(backend(), pid, affinity_strategy())
}

pub fn set_cpu_affinity(pid: i64, cpus: &[usize]) -> SysResult<()> {
    ops::set_cpu_affinity(backend(), pid, cpus)
}

pub fn get_ionice(pid: i64) -> SysResult<IoPriority> {
    ops::get_ionice(backend(), pid)
}

/// No validation beyond the encoding; bad pairs fail in the kernel
pub fn set_ionice(pid: i64, class: i32, data: i32) -> SysResult<()> {
    ops::set_ionice(backend(), pid, class, data)
}

/// `resource` uses the `RLIMIT_*` numbering; see [`Resource`]
pub fn get_rlimit(pid: i64, resource: i32) -> SysResult<RLimit> {
    ops::get_rlimit(backend(), pid, resource)
}

pub fn set_rlimit(pid: i64, resource: i32, limit: RLimit) -> SysResult<()> {
    ops::set_rlimit(backend(), pid, resource, limit)
}
