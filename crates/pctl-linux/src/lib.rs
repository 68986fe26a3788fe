//! # pctl-linux
//!
//! Linux implementation of the `ProcessSyscalls` backend.
//!
//! This crate provides:
//! - `LinuxSyscalls`: `sysconf`, `getpriority`/`setpriority`,
//!   `sched_getaffinity`/`sched_setaffinity`, `ioprio_get`/`ioprio_set`
//!   and `prlimit`, each returning the raw errno on failure
//! - `AffinityConfig`: growth policy for the affinity mask, with
//!   environment overrides

pub mod config;

// Re-exports
pub use config::AffinityConfig;

// Platform detection
cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod platform_linux;
        pub use platform_linux::LinuxSyscalls;
        pub use platform_linux::LinuxSyscalls as CurrentPlatform;
    } else {
        compile_error!("Unsupported platform: pctl only targets Linux");
    }
}
