//! C ABI for host language runtimes
//!
//! Every function returns an `int` status: `0` for success, an errno value
//! as reported by the kernel, or one of the sentinels
//! [`STATUS_NO_RESULT`](crate::STATUS_NO_RESULT) (`-1`, negative pid) and
//! [`STATUS_AFFINITY_OVERFLOW`](crate::STATUS_AFFINITY_OVERFLOW) (`-2`).
//! Null out-pointers yield `EFAULT`.
//!
//! ```c
//! long get_clock_ticks(void);
//! long get_page_size(void);
//! int  get_priority(long pid, int *priority);
//! int  set_priority(long pid, int priority);
//! int  get_cpu_affinity(long pid, long *buf, int capacity, int *count);
//! int  set_cpu_affinity(long pid, const long *cpus, int seq_len);
//! int  get_ionice(long pid, int *ioclass, int *iodata);
//! int  set_ionice(long pid, int ioclass, int iodata);
//! int  get_rlimit(long pid, int resource, long long *soft, long long *hard);
//! int  set_rlimit(long pid, int resource, long long soft, long long hard);
//! ```
//!
//! Resource limits cross the boundary as signed 64-bit values, so
//! `RLIM_INFINITY` reads back as `-1`.

use libc::{c_int, c_long, c_longlong};

use pctl_core::errno::{EFAULT, EINVAL, ERANGE};
use pctl_core::RLimit;

#[no_mangle]
pub extern "C" fn get_clock_ticks() -> c_long {
    crate::get_clock_ticks() as c_long
}

#[no_mangle]
pub extern "C" fn get_page_size() -> c_long {
    crate::get_page_size() as c_long
}

/// Read the niceness of `pid` into `*priority`.
///
/// The status is returned even on success (`0` then), so a niceness of
/// `-1` is never mistaken for failure.
///
/// # Safety
///
/// `priority` must be null or valid for writing one `int`.
#[no_mangle]
pub unsafe extern "C" fn get_priority(pid: c_long, priority: *mut c_int) -> c_int {
    if priority.is_null() {
        return EFAULT;
    }
    match crate::get_priority(pid as i64) {
        Ok(prio) => {
            *priority = prio;
            0
        }
        Err(e) => {
            *priority = -1;
            e.code()
        }
    }
}

#[no_mangle]
pub extern "C" fn set_priority(pid: c_long, priority: c_int) -> c_int {
    crate::status_of(&crate::set_priority(pid as i64, priority))
}

/// Write the allowed CPUs of `pid` into a caller-owned buffer.
///
/// `*count` always receives the number of CPUs in the mask on success. If
/// that exceeds `capacity`, nothing is written to `buf` and `ERANGE` is
/// returned so the caller can retry with a larger buffer. A negative pid
/// returns `-1` with `*count` set to `0`.
///
/// # Safety
///
/// `count` must be null or valid for writing one `int`; `buf` must be null
/// or valid for writing `capacity` `long`s.
#[no_mangle]
pub unsafe extern "C" fn get_cpu_affinity(
    pid: c_long,
    buf: *mut c_long,
    capacity: c_int,
    count: *mut c_int,
) -> c_int {
    if count.is_null() {
        return EFAULT;
    }
    let cpus = match crate::get_cpu_affinity(pid as i64) {
        Ok(cpus) => cpus,
        Err(e) => {
            *count = 0;
            return e.code();
        }
    };

    *count = cpus.len() as c_int;
    if cpus.len() > capacity.max(0) as usize {
        return ERANGE;
    }
    if buf.is_null() && !cpus.is_empty() {
        return EFAULT;
    }
    for (i, &cpu) in cpus.iter().enumerate() {
        *buf.add(i) = cpu as c_long;
    }
    0
}

/// Replace the affinity mask of `pid` with the first `seq_len` entries of
/// `cpus`. Negative indices are rejected with `EINVAL`.
///
/// # Safety
///
/// `cpus` must be null or valid for reading `seq_len` `long`s.
#[no_mangle]
pub unsafe extern "C" fn set_cpu_affinity(pid: c_long, cpus: *const c_long, seq_len: c_int) -> c_int {
    if seq_len < 0 {
        return EINVAL;
    }
    let raw: &[c_long] = if seq_len == 0 {
        &[]
    } else if cpus.is_null() {
        return EFAULT;
    } else {
        std::slice::from_raw_parts(cpus, seq_len as usize)
    };

    let mut list = Vec::with_capacity(raw.len());
    for &cpu in raw {
        match usize::try_from(cpu) {
            Ok(cpu) => list.push(cpu),
            Err(_) => return EINVAL,
        }
    }
    crate::status_of(&crate::set_cpu_affinity(pid as i64, &list))
}

/// # Safety
///
/// `ioclass` and `iodata` must be null or valid for writing one `int` each.
#[no_mangle]
pub unsafe extern "C" fn get_ionice(pid: c_long, ioclass: *mut c_int, iodata: *mut c_int) -> c_int {
    if ioclass.is_null() || iodata.is_null() {
        return EFAULT;
    }
    match crate::get_ionice(pid as i64) {
        Ok(prio) => {
            *ioclass = prio.class;
            *iodata = prio.data;
            0
        }
        Err(e) => e.code(),
    }
}

#[no_mangle]
pub extern "C" fn set_ionice(pid: c_long, ioclass: c_int, iodata: c_int) -> c_int {
    crate::status_of(&crate::set_ionice(pid as i64, ioclass, iodata))
}

/// Read `(soft, hard)` for `resource`. `soft` is `rlim_cur`.
///
/// # Safety
///
/// `soft` and `hard` must be null or valid for writing one `long long` each.
#[no_mangle]
pub unsafe extern "C" fn get_rlimit(
    pid: c_long,
    resource: c_int,
    soft: *mut c_longlong,
    hard: *mut c_longlong,
) -> c_int {
    if soft.is_null() || hard.is_null() {
        return EFAULT;
    }
    match crate::get_rlimit(pid as i64, resource) {
        Ok(limit) => {
            *soft = limit.soft as c_longlong;
            *hard = limit.hard as c_longlong;
            0
        }
        Err(e) => e.code(),
    }
}

/// Install `(soft, hard)` for `resource`. `soft` becomes `rlim_cur`.
#[no_mangle]
pub extern "C" fn set_rlimit(pid: c_long, resource: c_int, soft: c_longlong, hard: c_longlong) -> c_int {
    let limit = RLimit::new(soft as u64, hard as u64);
    crate::status_of(&crate::set_rlimit(pid as i64, resource, limit))
}
