//! Error types for process-control operations
//!
//! The taxonomy is flat: an OS errno passed through verbatim, or one of two
//! sentinels produced by the affinity getter. `InvalidArgument` is only
//! raised by the validating `Process` layer in the `pctl` crate.

use core::fmt;

use crate::errno::{errno_name, EINVAL};

/// Status code for a negative pid rejected before any syscall.
pub const STATUS_NO_RESULT: i32 = -1;

/// Status code for an affinity mask that could not be grown any further.
pub const STATUS_AFFINITY_OVERFLOW: i32 = -2;

/// Result type for process-control operations
pub type SysResult<T> = Result<T, SysError>;

/// Errors that can occur in process-control operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SysError {
    /// errno reported by the kernel, unmodified
    Os(i32),

    /// Negative pid; nothing was asked of the kernel
    NoResult,

    /// Kernel kept rejecting the CPU mask size and doubling would overflow
    AffinityOverflow,

    /// Caller-side argument check failed
    InvalidArgument(String),
}

impl SysError {
    /// Flat numeric status, as handed across the C boundary.
    pub fn code(&self) -> i32 {
        match self {
            SysError::Os(errno) => *errno,
            SysError::NoResult => STATUS_NO_RESULT,
            SysError::AffinityOverflow => STATUS_AFFINITY_OVERFLOW,
            SysError::InvalidArgument(_) => EINVAL,
        }
    }

    /// errno value, if this error came from the kernel.
    pub fn os_error(&self) -> Option<i32> {
        match self {
            SysError::Os(errno) => Some(*errno),
            _ => None,
        }
    }

    pub fn is_errno(&self, errno: i32) -> bool {
        self.os_error() == Some(errno)
    }
}

impl fmt::Display for SysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SysError::Os(errno) => write!(f, "{} ({})", errno_name(*errno), errno),
            SysError::NoResult => write!(f, "no result (negative pid)"),
            SysError::AffinityOverflow => write!(f, "could not allocate a large enough CPU set"),
            SysError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for SysError {}

impl From<i32> for SysError {
    fn from(errno: i32) -> Self {
        SysError::Os(errno)
    }
}

/// Collapse a result into the `0 = ok` status convention.
#[inline]
pub fn status_of<T>(result: &SysResult<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.code(),
    }
}
