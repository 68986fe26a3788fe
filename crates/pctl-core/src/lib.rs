//! # pctl-core
//!
//! Core types and operations for Linux process control: CPU affinity,
//! I/O priority, scheduling niceness, resource limits and the clock/page
//! constants.
//!
//! This crate is platform-agnostic and contains no OS-specific code. The
//! operations in [`ops`] are written against the [`ProcessSyscalls`] trait;
//! the Linux backend lives in `pctl-linux`.
//!
//! ## Modules
//!
//! - `error` - Flat error taxonomy (errno passthrough + two sentinels)
//! - `errno` - errno constants and names
//! - `cpuset` - Growable CPU affinity bitset
//! - `ioprio` - I/O priority class/level encoding
//! - `rlimit` - Resource kinds and limit pairs
//! - `nice` - Niceness bounds
//! - `traits` - Backend trait, one method per kernel entry point
//! - `ops` - The operations, including the affinity growth loop
//! - `plog` - Leveled stderr logging macros
//! - `env` - Environment variable utilities

pub mod env;
pub mod plog;
pub mod errno;
pub mod error;
pub mod cpuset;
pub mod ioprio;
pub mod rlimit;
pub mod nice;
pub mod traits;
pub mod ops;

// Re-exports for convenience
pub use cpuset::CpuSet;
pub use error::{status_of, SysError, SysResult, STATUS_AFFINITY_OVERFLOW, STATUS_NO_RESULT};
pub use ioprio::{IoClass, IoPriority};
pub use nice::{check_nice, NICE_MAX, NICE_MIN};
pub use ops::AffinityStrategy;
pub use plog::{set_log_level, LogLevel};
pub use rlimit::{RLimit, Resource, RLIM_INFINITY};
pub use traits::ProcessSyscalls;
pub use env::{env_get, env_get_bool, env_get_opt};
