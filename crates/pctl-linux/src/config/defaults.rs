//! Library defaults for the affinity growth policy

use pctl_core::cpuset::{BITS_PER_WORD, CPU_SETSIZE};

/// First mask holds one `unsigned long` worth of CPUs
pub const AFFINITY_START_CPUS: usize = BITS_PER_WORD;

/// Doubling stops before passing `INT_MAX` CPUs
pub const AFFINITY_MAX_CPUS: usize = i32::MAX as usize;

/// Use a single static `cpu_set_t` instead of growing
pub const AFFINITY_FIXED: bool = false;

/// Width of the static set used when `AFFINITY_FIXED` is on
pub const AFFINITY_FIXED_CPUS: usize = CPU_SETSIZE;
