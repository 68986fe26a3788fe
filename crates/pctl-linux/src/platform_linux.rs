//! Linux platform implementation
//!
//! Every method is one syscall. Failures return the errno the kernel left
//! behind; nothing is retried or translated here.

use nix::errno::Errno;
use nix::unistd::{sysconf, SysconfVar};

use pctl_core::cpuset::CpuSet;
use pctl_core::ioprio::IOPRIO_WHO_PROCESS;
use pctl_core::rlimit::{RLimit, RLIM_INFINITY};
use pctl_core::traits::ProcessSyscalls;
use pctl_core::ptrace;

/// Linux syscall backend
#[derive(Debug, Clone, Copy)]
pub struct LinuxSyscalls;

impl LinuxSyscalls {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinuxSyscalls {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn last_errno() -> i32 {
    Errno::last() as i32
}

/// pids that do not fit `pid_t` cannot name a process
#[inline]
fn to_pid(pid: i64) -> Result<libc::pid_t, i32> {
    libc::pid_t::try_from(pid).map_err(|_| libc::ESRCH)
}

fn sysconf_or(var: SysconfVar, fallback: i64) -> i64 {
    match sysconf(var) {
        Ok(Some(v)) => i64::from(v),
        _ => fallback,
    }
}

fn rlim_from_kernel(v: libc::rlim_t) -> u64 {
    if v == libc::RLIM_INFINITY {
        RLIM_INFINITY
    } else {
        v as u64
    }
}

fn rlim_to_kernel(v: u64) -> libc::rlim_t {
    if v == RLIM_INFINITY {
        libc::RLIM_INFINITY
    } else {
        v as libc::rlim_t
    }
}

impl ProcessSyscalls for LinuxSyscalls {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn clock_ticks(&self) -> i64 {
        sysconf_or(SysconfVar::CLK_TCK, -1)
    }

    fn page_size(&self) -> i64 {
        sysconf_or(SysconfVar::PAGE_SIZE, -1)
    }

    fn cpu_count(&self) -> usize {
        let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        if n < 1 {
            1
        } else {
            n as usize
        }
    }

    fn getpriority(&self, pid: i64) -> Result<i32, i32> {
        let who = to_pid(pid)? as libc::id_t;

        // -1 is a legal niceness; only a changed errno marks failure
        Errno::clear();
        let prio = unsafe { libc::getpriority(libc::PRIO_PROCESS, who) };
        if prio == -1 {
            let errno = last_errno();
            if errno != 0 {
                return Err(errno);
            }
        }
        ptrace!("getpriority({}) -> {}", pid, prio);
        Ok(prio)
    }

    fn setpriority(&self, pid: i64, prio: i32) -> Result<(), i32> {
        let who = to_pid(pid)? as libc::id_t;
        let ret = unsafe { libc::setpriority(libc::PRIO_PROCESS, who, prio) };
        if ret == -1 {
            return Err(last_errno());
        }
        Ok(())
    }

    fn sched_getaffinity(&self, pid: i64, mask: &mut CpuSet) -> Result<(), i32> {
        let pid = to_pid(pid)?;
        let len = mask.byte_len();
        let ptr = mask.as_words_mut().as_mut_ptr().cast::<libc::cpu_set_t>();

        // Safety: `ptr` addresses `len` writable bytes of whole words.
        let ret = unsafe { libc::sched_getaffinity(pid, len, ptr) };
        if ret == -1 {
            return Err(last_errno());
        }
        Ok(())
    }

    fn sched_setaffinity(&self, pid: i64, mask: &CpuSet) -> Result<(), i32> {
        let pid = to_pid(pid)?;
        let len = mask.byte_len();
        let ptr = mask.as_words().as_ptr().cast::<libc::cpu_set_t>();

        // Safety: the kernel only reads `len` bytes from `ptr`.
        let ret = unsafe { libc::sched_setaffinity(pid, len, ptr) };
        if ret == -1 {
            return Err(last_errno());
        }
        Ok(())
    }

    fn ioprio_get(&self, pid: i64) -> Result<i32, i32> {
        let pid = to_pid(pid)?;
        let ret = unsafe { libc::syscall(libc::SYS_ioprio_get, IOPRIO_WHO_PROCESS, pid) };
        if ret == -1 {
            return Err(last_errno());
        }
        ptrace!("ioprio_get({}) -> {:#x}", pid, ret);
        Ok(ret as i32)
    }

    fn ioprio_set(&self, pid: i64, ioprio: i32) -> Result<(), i32> {
        let pid = to_pid(pid)?;
        let ret = unsafe { libc::syscall(libc::SYS_ioprio_set, IOPRIO_WHO_PROCESS, pid, ioprio) };
        if ret == -1 {
            return Err(last_errno());
        }
        Ok(())
    }

    fn prlimit(&self, pid: i64, resource: i32, new: Option<RLimit>) -> Result<RLimit, i32> {
        let pid = to_pid(pid)?;
        let new = new.map(|l| libc::rlimit {
            rlim_cur: rlim_to_kernel(l.soft),
            rlim_max: rlim_to_kernel(l.hard),
        });
        let new_ptr = match &new {
            Some(l) => l as *const libc::rlimit,
            None => std::ptr::null(),
        };
        let mut old = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };

        let ret = unsafe { libc::prlimit(pid, resource as _, new_ptr, &mut old) };
        if ret == -1 {
            return Err(last_errno());
        }
        Ok(RLimit::new(rlim_from_kernel(old.rlim_cur), rlim_from_kernel(old.rlim_max)))
    }
}
