//! Scheduling niceness bounds

use crate::error::{SysError, SysResult};

/// Highest scheduling priority
pub const NICE_MIN: i32 = -20;

/// Lowest scheduling priority
pub const NICE_MAX: i32 = 19;

/// Reject values outside `NICE_MIN..=NICE_MAX`
pub fn check_nice(value: i32) -> SysResult<i32> {
    if (NICE_MIN..=NICE_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(SysError::InvalidArgument(format!(
            "nice expected is an integer between {} and {}, got {}",
            NICE_MIN, NICE_MAX, value
        )))
    }
}
