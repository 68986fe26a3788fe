//! Process handle with argument checks
//!
//! `Process` wraps a pid and validates arguments before handing them to the
//! operations, so callers get `InvalidArgument` instead of an opaque errno
//! for the common mistakes.

use pctl_core::errno::EINVAL;
use pctl_core::ops;
use pctl_core::{
    check_nice, AffinityStrategy, IoClass, IoPriority, ProcessSyscalls, RLimit, Resource,
    SysError, SysResult,
};
use pctl_linux::LinuxSyscalls;

/// A process addressed by pid
#[derive(Debug, Clone)]
pub struct Process<S: ProcessSyscalls = LinuxSyscalls> {
    pid: i64,
    sys: S,
    strategy: AffinityStrategy,
}

impl Process<LinuxSyscalls> {
    /// Handle for `pid` on the Linux backend
    pub fn new(pid: i64) -> Self {
        Self::with_backend(pid, LinuxSyscalls::new(), crate::affinity_strategy())
    }

    /// Handle for the calling process
    pub fn current() -> Self {
        Self::new(i64::from(nix::unistd::getpid().as_raw()))
    }
}

impl<S: ProcessSyscalls> Process<S> {
    pub fn with_backend(pid: i64, sys: S, strategy: AffinityStrategy) -> Self {
        Self { pid, sys, strategy }
    }

    #[inline]
    pub fn pid(&self) -> i64 {
        self.pid
    }

    /// Online CPUs on this system
    pub fn cpu_count(&self) -> usize {
        self.sys.cpu_count()
    }

    /// Allowed CPUs, ascending; empty for a negative pid
    pub fn cpu_affinity(&self) -> SysResult<Vec<usize>> {
        match ops::get_cpu_affinity(&self.sys, self.pid, self.strategy) {
            Err(SysError::NoResult) => Ok(Vec::new()),
            other => other,
        }
    }

    /// Restrict the process to `cpus`
    ///
    /// At most `cpu_count()` entries are used. If the kernel rejects the
    /// mask, an index outside `[0, cpu_count())` is reported as
    /// `InvalidArgument`; otherwise the kernel's error is returned.
    pub fn set_cpu_affinity(&self, cpus: &[usize]) -> SysResult<()> {
        let total = self.cpu_count();
        let seq = &cpus[..cpus.len().min(total)];

        match ops::set_cpu_affinity(&self.sys, self.pid, seq) {
            Err(e) if e.is_errno(EINVAL) => {
                if let Some(&cpu) = cpus.iter().find(|&&cpu| cpu >= total) {
                    return Err(SysError::InvalidArgument(format!(
                        "invalid CPU {} (choose between 0 and {})",
                        cpu,
                        total - 1
                    )));
                }
                Err(e)
            }
            other => other,
        }
    }

    /// Scheduling niceness
    pub fn nice(&self) -> SysResult<i32> {
        ops::get_priority(&self.sys, self.pid)
    }

    /// Set niceness; must lie in `-20..=19`
    pub fn set_nice(&self, value: i32) -> SysResult<()> {
        let value = check_nice(value)?;
        ops::set_priority(&self.sys, self.pid, value)
    }

    pub fn ionice(&self) -> SysResult<IoPriority> {
        ops::get_ionice(&self.sys, self.pid)
    }

    /// Set I/O class and level
    ///
    /// See [`IoPriority::normalized`] for the defaults and accepted ranges.
    pub fn set_ionice(&self, class: IoClass, value: Option<i32>) -> SysResult<()> {
        let prio = IoPriority::normalized(class, value)?;
        ops::set_ionice(&self.sys, self.pid, prio.class, prio.data)
    }

    /// Resource limit as `(soft, hard)`
    pub fn rlimit(&self, resource: Resource) -> SysResult<RLimit> {
        self.check_prlimit_pid()?;
        ops::get_rlimit(&self.sys, self.pid, resource.as_raw())
    }

    /// Set both bounds of a resource limit
    pub fn set_rlimit(&self, resource: Resource, limit: RLimit) -> SysResult<()> {
        self.check_prlimit_pid()?;
        ops::set_rlimit(&self.sys, self.pid, resource.as_raw(), limit)
    }

    // prlimit(0, ...) would act on the caller, not on pid 0
    fn check_prlimit_pid(&self) -> SysResult<()> {
        if self.pid == 0 {
            return Err(SysError::InvalidArgument(
                "can't use prlimit() against PID 0 process".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pctl_core::errno::ESRCH;
    use pctl_core::CpuSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const ONLINE: usize = 4;

    /// Four-CPU kernel that records every call
    #[derive(Default)]
    struct FourCpus {
        calls: AtomicUsize,
        affinity: Mutex<Vec<usize>>,
        ioprio: Mutex<i32>,
    }

    impl FourCpus {
        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ProcessSyscalls for FourCpus {
        fn name(&self) -> &'static str {
            "four-cpus"
        }
        fn clock_ticks(&self) -> i64 {
            100
        }
        fn page_size(&self) -> i64 {
            4096
        }
        fn cpu_count(&self) -> usize {
            ONLINE
        }
        fn getpriority(&self, _pid: i64) -> Result<i32, i32> {
            self.hit();
            Ok(-1)
        }
        fn setpriority(&self, _pid: i64, _prio: i32) -> Result<(), i32> {
            self.hit();
            Ok(())
        }
        fn sched_getaffinity(&self, _pid: i64, mask: &mut CpuSet) -> Result<(), i32> {
            self.hit();
            for &cpu in self.affinity.lock().unwrap().iter() {
                mask.set(cpu);
            }
            Ok(())
        }
        fn sched_setaffinity(&self, _pid: i64, mask: &CpuSet) -> Result<(), i32> {
            self.hit();
            let online: Vec<usize> = mask.iter().filter(|&c| c < ONLINE).collect();
            if online.is_empty() {
                return Err(EINVAL);
            }
            *self.affinity.lock().unwrap() = online;
            Ok(())
        }
        fn ioprio_get(&self, _pid: i64) -> Result<i32, i32> {
            self.hit();
            Ok(*self.ioprio.lock().unwrap())
        }
        fn ioprio_set(&self, _pid: i64, ioprio: i32) -> Result<(), i32> {
            self.hit();
            *self.ioprio.lock().unwrap() = ioprio;
            Ok(())
        }
        fn prlimit(&self, pid: i64, _resource: i32, _new: Option<RLimit>) -> Result<RLimit, i32> {
            self.hit();
            if pid == 99 {
                return Err(ESRCH);
            }
            Ok(RLimit::new(1024, 4096))
        }
    }

    fn process(pid: i64) -> Process<FourCpus> {
        Process::with_backend(pid, FourCpus::default(), AffinityStrategy::growable())
    }

    #[test]
    fn test_negative_pid_affinity_is_empty() {
        let p = process(-1);
        assert_eq!(p.cpu_affinity(), Ok(vec![]));
        assert_eq!(p.sys.calls(), 0);
    }

    #[test]
    fn test_set_affinity_scenario() {
        let p = process(10);
        p.set_cpu_affinity(&[0, 2]).unwrap();
        let cpus = p.cpu_affinity().unwrap();
        assert_eq!(cpus.len(), 2);
        assert_eq!(cpus, vec![0, 2]);
    }

    #[test]
    fn test_set_affinity_invalid_cpu() {
        let p = process(10);
        let err = p.set_cpu_affinity(&[9]).unwrap_err();
        assert_eq!(
            err,
            SysError::InvalidArgument("invalid CPU 9 (choose between 0 and 3)".into())
        );
    }

    #[test]
    fn test_set_affinity_truncates_to_cpu_count() {
        let p = process(10);
        // Only the first four entries reach the kernel
        p.set_cpu_affinity(&[1, 1, 1, 1, 2]).unwrap();
        assert_eq!(p.cpu_affinity(), Ok(vec![1]));
    }

    #[test]
    fn test_nice_checked_before_syscall() {
        let p = process(10);
        assert!(matches!(p.set_nice(20), Err(SysError::InvalidArgument(_))));
        assert!(matches!(p.set_nice(-21), Err(SysError::InvalidArgument(_))));
        assert_eq!(p.sys.calls(), 0);

        p.set_nice(10).unwrap();
        // -1 is a real niceness
        assert_eq!(p.nice(), Ok(-1));
    }

    #[test]
    fn test_ionice_normalized() {
        let p = process(10);
        p.set_ionice(IoClass::BestEffort, None).unwrap();
        assert_eq!(p.ionice(), Ok(IoPriority::new(2, 4)));

        p.set_ionice(IoClass::Idle, None).unwrap();
        assert_eq!(p.ionice(), Ok(IoPriority::new(3, 0)));

        let calls = p.sys.calls();
        assert!(p.set_ionice(IoClass::Idle, Some(1)).is_err());
        assert!(p.set_ionice(IoClass::RealTime, Some(8)).is_err());
        assert_eq!(p.sys.calls(), calls);
    }

    #[test]
    fn test_rlimit_pid_zero_rejected() {
        let p = process(0);
        assert!(matches!(p.rlimit(Resource::Nofile), Err(SysError::InvalidArgument(_))));
        assert!(matches!(
            p.set_rlimit(Resource::Nofile, RLimit::new(1, 1)),
            Err(SysError::InvalidArgument(_))
        ));
        assert_eq!(p.sys.calls(), 0);
    }

    #[test]
    fn test_rlimit_passthrough() {
        assert_eq!(process(10).rlimit(Resource::Nofile), Ok(RLimit::new(1024, 4096)));
        assert_eq!(process(99).rlimit(Resource::Nofile), Err(SysError::Os(ESRCH)));
    }

    #[test]
    fn test_current_process_linux() {
        let me = Process::current();
        assert!(me.pid() > 0);
        assert!(!me.cpu_affinity().unwrap().is_empty());
        let limit = me.rlimit(Resource::Nofile).unwrap();
        assert!(limit.soft <= limit.hard);
    }
}
