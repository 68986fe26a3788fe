//! Leveled stderr logging for pctl
//!
//! The operations log at debug/trace only; errors are returned, not printed.
//! Each line carries the pid of the logging process, since a host runtime
//! may fork after loading the library.
//!
//! # Environment Variables
//!
//! - `PCTL_LOG_LEVEL=<level>` - off, error, warn (default), info, debug, trace (or 0-5)
//! - `PCTL_FLUSH_EPRINT=1` - Flush stderr after each line
//!
//! # Usage
//!
//! ```ignore
//! use pctl_core::{pdebug, pwarn};
//!
//! pwarn!("ignoring affinity config: {}", why);
//! pdebug!("sched_getaffinity: mask of {} CPUs too small", ncpus);
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Once;

use crate::env::{env_get_bool, env_get_opt};

/// Log levels
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    const ALL: [LogLevel; 6] = [
        LogLevel::Off,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// Clamps anything above `Trace`
    pub fn from_raw(v: u8) -> Self {
        Self::ALL[usize::from(v).min(Self::ALL.len() - 1)]
    }

    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse a level name or digit; `None` for anything else
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return (usize::from(n) < Self::ALL.len()).then(|| Self::from_raw(n));
        }
        Self::ALL.into_iter().find(|l| l.name().eq_ignore_ascii_case(s))
    }
}

static INIT: Once = Once::new();
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);
static FLUSH: AtomicBool = AtomicBool::new(false);

/// Read `PCTL_LOG_LEVEL` and `PCTL_FLUSH_EPRINT` once
///
/// A level set with [`set_log_level`] before this runs is kept.
pub fn init() {
    INIT.call_once(|| {
        FLUSH.store(env_get_bool("PCTL_FLUSH_EPRINT", false), Ordering::Relaxed);
        if let Some(level) = env_get_opt::<String>("PCTL_LOG_LEVEL").and_then(|v| LogLevel::parse(&v)) {
            LOG_LEVEL.store(level as u8, Ordering::Relaxed);
        }
    });
}

pub fn log_level() -> LogLevel {
    init();
    LogLevel::from_raw(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Override the environment
pub fn set_log_level(level: LogLevel) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level <= log_level()
}

#[doc(hidden)]
pub fn _plog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let line = format!("[pctl {} {}] {}\n", level.name(), std::process::id(), args);
    let mut stderr = std::io::stderr().lock();
    let _ = stderr.write_all(line.as_bytes());
    if FLUSH.load(Ordering::Relaxed) {
        let _ = stderr.flush();
    }
}

// ============================================================================
// Public Macros
// ============================================================================

/// Log at an explicit [`LogLevel`]
#[macro_export]
macro_rules! plog {
    ($level:expr, $($arg:tt)*) => {
        $crate::plog::_plog_impl($level, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! perror {
    ($($arg:tt)*) => { $crate::plog!($crate::plog::LogLevel::Error, $($arg)*) };
}

#[macro_export]
macro_rules! pwarn {
    ($($arg:tt)*) => { $crate::plog!($crate::plog::LogLevel::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! pinfo {
    ($($arg:tt)*) => { $crate::plog!($crate::plog::LogLevel::Info, $($arg)*) };
}

#[macro_export]
macro_rules! pdebug {
    ($($arg:tt)*) => { $crate::plog!($crate::plog::LogLevel::Debug, $($arg)*) };
}

/// One line per syscall
#[macro_export]
macro_rules! ptrace {
    ($($arg:tt)*) => { $crate::plog!($crate::plog::LogLevel::Trace, $($arg)*) };
}
