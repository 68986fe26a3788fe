//! pctl configuration
//!
//! Provides compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder calls
//! 2. Environment variables (runtime)
//! 3. Library defaults (`defaults`)
//!
//! # Example
//!
//! ```rust,ignore
//! use pctl_linux::config::AffinityConfig;
//!
//! // Defaults with env overrides
//! let config = AffinityConfig::from_env();
//!
//! // Or pin the policy programmatically
//! let config = AffinityConfig::from_env().start_cpus(256);
//! ```

pub mod defaults;

use pctl_core::env::{env_get, env_get_bool};
use pctl_core::ops::{AffinityStrategy, MAX_AFFINITY_CPUS};

/// Growth policy for `get_cpu_affinity`, with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinityConfig {
    /// CPUs the first mask is sized for
    pub start_cpus: usize,
    /// Give up once doubling would pass this many CPUs
    pub max_cpus: usize,
    /// Single static `cpu_set_t`, no retry
    pub fixed: bool,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AffinityConfig {
    /// Library defaults, ignoring the environment.
    pub fn builtin() -> Self {
        Self {
            start_cpus: defaults::AFFINITY_START_CPUS,
            max_cpus: defaults::AFFINITY_MAX_CPUS,
            fixed: defaults::AFFINITY_FIXED,
        }
    }

    /// Create config from library defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `PCTL_AFFINITY_START_CPUS` - CPUs the first mask is sized for
    /// - `PCTL_AFFINITY_MAX_CPUS` - Growth ceiling
    /// - `PCTL_AFFINITY_FIXED` - Use one static 1024-CPU set (0/1)
    pub fn from_env() -> Self {
        Self {
            start_cpus: env_get("PCTL_AFFINITY_START_CPUS", defaults::AFFINITY_START_CPUS),
            max_cpus: env_get("PCTL_AFFINITY_MAX_CPUS", defaults::AFFINITY_MAX_CPUS),
            fixed: env_get_bool("PCTL_AFFINITY_FIXED", defaults::AFFINITY_FIXED),
        }
    }

    /// Set the size of the first mask
    pub fn start_cpus(mut self, n: usize) -> Self {
        self.start_cpus = n;
        self
    }

    /// Set the growth ceiling
    pub fn max_cpus(mut self, n: usize) -> Self {
        self.max_cpus = n;
        self
    }

    /// Enable or disable the fixed-size strategy
    pub fn fixed(mut self, enable: bool) -> Self {
        self.fixed = enable;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.fixed {
            return Ok(());
        }
        if self.start_cpus == 0 {
            return Err("start_cpus must be at least 1");
        }
        if self.max_cpus < self.start_cpus {
            return Err("max_cpus must not be below start_cpus");
        }
        if self.max_cpus > MAX_AFFINITY_CPUS {
            return Err("max_cpus must not exceed i32::MAX");
        }
        Ok(())
    }

    /// Strategy handed to the affinity getter
    ///
    /// An invalid config falls back to the library defaults.
    pub fn strategy(&self) -> AffinityStrategy {
        if self.fixed {
            return AffinityStrategy {
                start_cpus: defaults::AFFINITY_FIXED_CPUS,
                max_cpus: defaults::AFFINITY_FIXED_CPUS,
            };
        }
        if let Err(why) = self.validate() {
            pctl_core::pwarn!("ignoring affinity config {:?}: {}", self, why);
            return AffinityStrategy::growable();
        }
        AffinityStrategy {
            start_cpus: self.start_cpus,
            max_cpus: self.max_cpus,
        }
    }
}
