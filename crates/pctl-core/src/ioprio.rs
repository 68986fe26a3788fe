//! I/O scheduling priority
//!
//! The kernel packs class and level into one integer:
//! `(class << IOPRIO_CLASS_SHIFT) | data`. Constants match `linux/ioprio.h`.

use crate::error::{SysError, SysResult};

/// `ioprio_get`/`ioprio_set` target selector for a single process
pub const IOPRIO_WHO_PROCESS: i32 = 1;
pub const IOPRIO_WHO_PGRP: i32 = 2;
pub const IOPRIO_WHO_USER: i32 = 3;

pub const IOPRIO_CLASS_SHIFT: u32 = 13;
pub const IOPRIO_PRIO_MASK: i32 = (1 << IOPRIO_CLASS_SHIFT) - 1;

/// Highest level within the realtime and best-effort classes
pub const IOPRIO_DATA_MAX: i32 = 7;

/// Level applied when realtime or best-effort is requested without one
pub const IOPRIO_DATA_DEFAULT: i32 = 4;

/// I/O scheduling class
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoClass {
    None = 0,
    RealTime = 1,
    BestEffort = 2,
    Idle = 3,
}

impl IoClass {
    pub fn from_raw(v: i32) -> Option<Self> {
        match v {
            0 => Some(IoClass::None),
            1 => Some(IoClass::RealTime),
            2 => Some(IoClass::BestEffort),
            3 => Some(IoClass::Idle),
            _ => None,
        }
    }

    #[inline]
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            IoClass::None => "none",
            IoClass::RealTime => "rt",
            IoClass::BestEffort => "be",
            IoClass::Idle => "idle",
        }
    }
}

/// `IOPRIO_PRIO_VALUE`
#[inline]
pub const fn encode(class: i32, data: i32) -> i32 {
    (class << IOPRIO_CLASS_SHIFT) | data
}

/// `IOPRIO_PRIO_CLASS` and `IOPRIO_PRIO_DATA`
#[inline]
pub const fn decode(ioprio: i32) -> (i32, i32) {
    (ioprio >> IOPRIO_CLASS_SHIFT, ioprio & IOPRIO_PRIO_MASK)
}

/// A (class, level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoPriority {
    pub class: i32,
    pub data: i32,
}

impl IoPriority {
    pub const fn new(class: i32, data: i32) -> Self {
        Self { class, data }
    }

    pub const fn from_raw(ioprio: i32) -> Self {
        let (class, data) = decode(ioprio);
        Self { class, data }
    }

    pub const fn to_raw(self) -> i32 {
        encode(self.class, self.data)
    }

    /// Typed class, if the kernel reported a known one
    pub fn io_class(self) -> Option<IoClass> {
        IoClass::from_raw(self.class)
    }

    /// Fill in and check a level for `class`
    ///
    /// `None` and `Idle` take no level. `RealTime` and `BestEffort` default
    /// to [`IOPRIO_DATA_DEFAULT`]. Levels must lie in `0..=7`.
    pub fn normalized(class: IoClass, value: Option<i32>) -> SysResult<Self> {
        let data = match class {
            IoClass::None | IoClass::Idle => {
                if value.is_some() {
                    return Err(SysError::InvalidArgument(format!(
                        "can't specify value with class {}",
                        class.name()
                    )));
                }
                0
            }
            IoClass::RealTime | IoClass::BestEffort => value.unwrap_or(IOPRIO_DATA_DEFAULT),
        };

        if !(0..=IOPRIO_DATA_MAX).contains(&data) {
            return Err(SysError::InvalidArgument(format!(
                "value argument expected is an integer between 0 and {}, got {}",
                IOPRIO_DATA_MAX, data
            )));
        }

        Ok(Self::new(class.as_raw(), data))
    }
}
