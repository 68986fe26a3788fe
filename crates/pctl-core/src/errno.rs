//! POSIX errno values surfaced by the process-control calls.
//!
//! Values are the Linux numbers. They are passed through unmodified; the
//! names only exist so errors print as `ESRCH (3)` instead of a bare `3`.
//!
//! For any errno not listed here, [`errno_name`] returns `"errno"`.

// ── Process / permission ──────────────────────────────────────────

pub const EPERM:   i32 = 1;
pub const ENOENT:  i32 = 2;
pub const ESRCH:   i32 = 3;
pub const EINTR:   i32 = 4;
pub const EIO:     i32 = 5;
pub const EACCES:  i32 = 13;

// ── Memory / resources ────────────────────────────────────────────

pub const EAGAIN:  i32 = 11;
pub const ENOMEM:  i32 = 12;
pub const EFAULT:  i32 = 14;
pub const EBUSY:   i32 = 16;

// ── Arguments ─────────────────────────────────────────────────────

pub const EINVAL:  i32 = 22;
pub const ERANGE:  i32 = 34;
pub const ENOSYS:  i32 = 38;

/// Symbolic name for an errno value.
///
/// ```
/// use pctl_core::errno::{errno_name, ESRCH};
///
/// assert_eq!(errno_name(ESRCH), "ESRCH");
/// assert_eq!(errno_name(255), "errno");
/// ```
pub fn errno_name(errno: i32) -> &'static str {
    match errno {
        EPERM  => "EPERM",
        ENOENT => "ENOENT",
        ESRCH  => "ESRCH",
        EINTR  => "EINTR",
        EIO    => "EIO",
        EAGAIN => "EAGAIN",
        ENOMEM => "ENOMEM",
        EACCES => "EACCES",
        EFAULT => "EFAULT",
        EBUSY  => "EBUSY",
        EINVAL => "EINVAL",
        ERANGE => "ERANGE",
        ENOSYS => "ENOSYS",
        _      => "errno",
    }
}
