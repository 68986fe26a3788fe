//! Process-control operations
//!
//! Each operation issues one kernel call through a [`ProcessSyscalls`]
//! backend and turns its outcome into a [`SysResult`]. Errno values pass
//! through unchanged. The affinity getter is the only one with a retry: it
//! grows the CPU mask while the kernel reports it as too small.

use crate::cpuset::{CpuSet, BITS_PER_WORD, CPU_SETSIZE};
use crate::errno::EINVAL;
use crate::error::{SysError, SysResult};
use crate::ioprio::IoPriority;
use crate::rlimit::RLimit;
use crate::traits::ProcessSyscalls;

/// Largest mask the kernel's `int` CPU ids can describe
pub const MAX_AFFINITY_CPUS: usize = i32::MAX as usize;

/// Growth policy for the affinity mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffinityStrategy {
    /// CPUs the first mask is sized for
    pub start_cpus: usize,
    /// Doubling stops once it would pass this many CPUs
    pub max_cpus: usize,
}

impl AffinityStrategy {
    /// Start at one `unsigned long` worth of CPUs and double up to `INT_MAX`
    pub const fn growable() -> Self {
        Self {
            start_cpus: BITS_PER_WORD,
            max_cpus: MAX_AFFINITY_CPUS,
        }
    }

    /// A single static `cpu_set_t` with no retry
    pub const fn fixed() -> Self {
        Self {
            start_cpus: CPU_SETSIZE,
            max_cpus: CPU_SETSIZE,
        }
    }
}

impl Default for AffinityStrategy {
    fn default() -> Self {
        Self::growable()
    }
}

/// Clock ticks per second
pub fn get_clock_ticks<S: ProcessSyscalls + ?Sized>(sys: &S) -> i64 {
    sys.clock_ticks()
}

/// Memory page size in bytes
pub fn get_page_size<S: ProcessSyscalls + ?Sized>(sys: &S) -> i64 {
    sys.page_size()
}

/// Scheduling niceness of `pid`
///
/// A niceness of -1 is a value, not an error.
pub fn get_priority<S: ProcessSyscalls + ?Sized>(sys: &S, pid: i64) -> SysResult<i32> {
    Ok(sys.getpriority(pid)?)
}

pub fn set_priority<S: ProcessSyscalls + ?Sized>(sys: &S, pid: i64, priority: i32) -> SysResult<()> {
    Ok(sys.setpriority(pid, priority)?)
}

/// CPUs `pid` may run on, ascending
///
/// Negative pids fail with [`SysError::NoResult`] before any syscall.
/// Retries with a doubled mask while the kernel answers `EINVAL`, and gives
/// up with [`SysError::AffinityOverflow`] when doubling would exceed
/// `strategy.max_cpus`. Both bounds are clamped to [`MAX_AFFINITY_CPUS`].
pub fn get_cpu_affinity<S: ProcessSyscalls + ?Sized>(
    sys: &S,
    pid: i64,
    strategy: AffinityStrategy,
) -> SysResult<Vec<usize>> {
    if pid < 0 {
        return Err(SysError::NoResult);
    }

    let max_cpus = strategy.max_cpus.min(MAX_AFFINITY_CPUS);
    let mut ncpus = strategy.start_cpus.clamp(1, max_cpus.max(1));
    loop {
        let mut mask = CpuSet::with_capacity(ncpus);
        match sys.sched_getaffinity(pid, &mut mask) {
            Ok(()) => {
                let cpus = mask.to_vec();
                crate::ptrace!("sched_getaffinity({}) -> {:?}", pid, cpus);
                return Ok(cpus);
            }
            Err(EINVAL) => {}
            Err(errno) => return Err(SysError::Os(errno)),
        }

        if ncpus > max_cpus / 2 {
            return Err(SysError::AffinityOverflow);
        }
        ncpus *= 2;
        crate::pdebug!("sched_getaffinity({}): mask too small, retrying with {} CPUs", pid, ncpus);
    }
}

/// Replace the affinity mask of `pid` with `cpus`
///
/// Duplicates are harmless. The mask is [`CPU_SETSIZE`] wide, or the online
/// CPU count if larger; indices past it are dropped and the kernel judges
/// what is left (an empty mask is `EINVAL`).
pub fn set_cpu_affinity<S: ProcessSyscalls + ?Sized>(
    sys: &S,
    pid: i64,
    cpus: &[usize],
) -> SysResult<()> {
    let width = sys.cpu_count().max(CPU_SETSIZE);
    let mask = CpuSet::from_cpus(cpus, width);
    if cpus.iter().any(|&cpu| cpu >= width) {
        crate::pdebug!("sched_setaffinity({}): dropping CPUs at or past {}", pid, width);
    }
    crate::ptrace!("sched_setaffinity({}, {:?})", pid, mask);
    Ok(sys.sched_setaffinity(pid, &mask)?)
}

/// I/O priority of `pid`, decoded
pub fn get_ionice<S: ProcessSyscalls + ?Sized>(sys: &S, pid: i64) -> SysResult<IoPriority> {
    let raw = sys.ioprio_get(pid)?;
    Ok(IoPriority::from_raw(raw))
}

/// Encode and install an I/O priority; no range checks
pub fn set_ionice<S: ProcessSyscalls + ?Sized>(
    sys: &S,
    pid: i64,
    class: i32,
    data: i32,
) -> SysResult<()> {
    Ok(sys.ioprio_set(pid, IoPriority::new(class, data).to_raw())?)
}

/// Resource limit of `pid`; first field is the soft limit
pub fn get_rlimit<S: ProcessSyscalls + ?Sized>(sys: &S, pid: i64, resource: i32) -> SysResult<RLimit> {
    Ok(sys.prlimit(pid, resource, None)?)
}

/// Install both bounds of a resource limit in one call
pub fn set_rlimit<S: ProcessSyscalls + ?Sized>(
    sys: &S,
    pid: i64,
    resource: i32,
    limit: RLimit,
) -> SysResult<()> {
    sys.prlimit(pid, resource, Some(limit))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errno::{EPERM, ESRCH};
    use crate::ioprio::IoClass;
    use crate::rlimit::{Resource, RLIM_INFINITY};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory kernel for a single process (pid 0 or 42)
    struct FakeKernel {
        /// Kernel mask width; smaller user masks get EINVAL
        kernel_cpus: usize,
        affinity: Mutex<CpuSet>,
        nice: Mutex<i32>,
        ioprio: Mutex<i32>,
        nofile: Mutex<RLimit>,
        calls: AtomicUsize,
        getaffinity_calls: AtomicUsize,
    }

    const OTHER_PID: i64 = 42;

    impl FakeKernel {
        fn new(kernel_cpus: usize, allowed: &[usize]) -> Self {
            Self {
                kernel_cpus,
                affinity: Mutex::new(CpuSet::from_cpus(allowed, kernel_cpus)),
                nice: Mutex::new(0),
                ioprio: Mutex::new(0),
                nofile: Mutex::new(RLimit::new(1024, 4096)),
                calls: AtomicUsize::new(0),
                getaffinity_calls: AtomicUsize::new(0),
            }
        }

        fn check_pid(&self, pid: i64) -> Result<(), i32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if pid == 0 || pid == OTHER_PID {
                Ok(())
            } else {
                Err(ESRCH)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ProcessSyscalls for FakeKernel {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn clock_ticks(&self) -> i64 {
            100
        }

        fn page_size(&self) -> i64 {
            4096
        }

        fn cpu_count(&self) -> usize {
            4
        }

        fn getpriority(&self, pid: i64) -> Result<i32, i32> {
            self.check_pid(pid)?;
            Ok(*self.nice.lock().unwrap())
        }

        fn setpriority(&self, pid: i64, prio: i32) -> Result<(), i32> {
            self.check_pid(pid)?;
            let mut nice = self.nice.lock().unwrap();
            if prio < *nice {
                return Err(EPERM);
            }
            *nice = prio;
            Ok(())
        }

        fn sched_getaffinity(&self, pid: i64, mask: &mut CpuSet) -> Result<(), i32> {
            self.check_pid(pid)?;
            self.getaffinity_calls.fetch_add(1, Ordering::SeqCst);
            if mask.capacity() < self.kernel_cpus {
                return Err(EINVAL);
            }
            mask.zero();
            for cpu in self.affinity.lock().unwrap().iter() {
                mask.set(cpu);
            }
            Ok(())
        }

        fn sched_setaffinity(&self, pid: i64, mask: &CpuSet) -> Result<(), i32> {
            self.check_pid(pid)?;
            let online = 4;
            let usable: Vec<usize> = mask.iter().filter(|&c| c < online).collect();
            if usable.is_empty() {
                return Err(EINVAL);
            }
            *self.affinity.lock().unwrap() = CpuSet::from_cpus(&usable, self.kernel_cpus);
            Ok(())
        }

        fn ioprio_get(&self, pid: i64) -> Result<i32, i32> {
            self.check_pid(pid)?;
            Ok(*self.ioprio.lock().unwrap())
        }

        fn ioprio_set(&self, pid: i64, ioprio: i32) -> Result<(), i32> {
            self.check_pid(pid)?;
            let prio = IoPriority::from_raw(ioprio);
            if prio.io_class().is_none() || prio.data > 7 {
                return Err(EINVAL);
            }
            *self.ioprio.lock().unwrap() = ioprio;
            Ok(())
        }

        fn prlimit(&self, pid: i64, resource: i32, new: Option<RLimit>) -> Result<RLimit, i32> {
            self.check_pid(pid)?;
            if resource != Resource::Nofile.as_raw() {
                return Err(EINVAL);
            }
            let mut cur = self.nofile.lock().unwrap();
            let old = *cur;
            if let Some(limit) = new {
                if !limit.is_consistent() {
                    return Err(EINVAL);
                }
                if limit.hard > old.hard {
                    return Err(EPERM);
                }
                *cur = limit;
            }
            Ok(old)
        }
    }

    #[test]
    fn test_constants_pass_through() {
        let k = FakeKernel::new(64, &[0]);
        assert_eq!(get_clock_ticks(&k), 100);
        assert_eq!(get_page_size(&k), 4096);
    }

    #[test]
    fn test_negative_pid_issues_no_syscall() {
        let k = FakeKernel::new(64, &[0, 1, 2, 3]);
        for pid in [-1, -2, i64::MIN] {
            let r = get_cpu_affinity(&k, pid, AffinityStrategy::growable());
            assert_eq!(r, Err(SysError::NoResult));
        }
        assert_eq!(k.calls(), 0);
    }

    #[test]
    fn test_affinity_count_matches_list() {
        let k = FakeKernel::new(64, &[0, 1, 3]);
        let cpus = get_cpu_affinity(&k, 0, AffinityStrategy::growable()).unwrap();
        assert_eq!(cpus, vec![0, 1, 3]);
        assert_eq!(cpus.len(), 3);
        assert!(cpus.iter().all(|&c| c < k.cpu_count()));
    }

    #[test]
    fn test_affinity_grows_until_kernel_fits() {
        // Kernel mask is 512 CPUs: 64 -> 128 -> 256 -> 512
        let k = FakeKernel::new(512, &[1, 300]);
        let cpus = get_cpu_affinity(&k, 0, AffinityStrategy::growable()).unwrap();
        assert_eq!(cpus, vec![1, 300]);
        assert_eq!(k.getaffinity_calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_affinity_overflow() {
        let k = FakeKernel::new(4096, &[0]);
        let strategy = AffinityStrategy { start_cpus: 64, max_cpus: 1024 };
        let r = get_cpu_affinity(&k, 0, strategy);
        assert_eq!(r, Err(SysError::AffinityOverflow));
        // 64, 128, 256, 512, 1024 tried; 2048 would pass the ceiling
        assert_eq!(k.getaffinity_calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_affinity_fixed_is_single_attempt() {
        let k = FakeKernel::new(2048, &[0]);
        let r = get_cpu_affinity(&k, 0, AffinityStrategy::fixed());
        assert_eq!(r, Err(SysError::AffinityOverflow));
        assert_eq!(k.getaffinity_calls.load(Ordering::SeqCst), 1);

        let k = FakeKernel::new(1024, &[5]);
        assert_eq!(get_cpu_affinity(&k, 0, AffinityStrategy::fixed()), Ok(vec![5]));
    }

    #[test]
    fn test_affinity_other_errors_are_terminal() {
        let k = FakeKernel::new(64, &[0]);
        let r = get_cpu_affinity(&k, 7, AffinityStrategy::growable());
        assert_eq!(r, Err(SysError::Os(ESRCH)));
        assert_eq!(k.calls(), 1);
    }

    #[test]
    fn test_set_then_get_affinity() {
        let k = FakeKernel::new(64, &[0, 1, 2, 3]);
        set_cpu_affinity(&k, OTHER_PID, &[0, 2]).unwrap();
        let cpus = get_cpu_affinity(&k, OTHER_PID, AffinityStrategy::default()).unwrap();
        assert_eq!(cpus, vec![0, 2]);

        set_cpu_affinity(&k, OTHER_PID, &[3, 3, 3]).unwrap();
        assert_eq!(get_cpu_affinity(&k, OTHER_PID, AffinityStrategy::default()).unwrap(), vec![3]);
    }

    #[test]
    fn test_set_affinity_error_verbatim() {
        let k = FakeKernel::new(64, &[0]);
        assert_eq!(set_cpu_affinity(&k, 0, &[99]), Err(SysError::Os(EINVAL)));
        assert_eq!(set_cpu_affinity(&k, 9, &[0]), Err(SysError::Os(ESRCH)));
    }

    #[test]
    fn test_set_affinity_huge_index_is_einval() {
        let k = FakeKernel::new(64, &[0, 1]);
        for cpu in [usize::MAX, usize::MAX >> 14] {
            assert_eq!(set_cpu_affinity(&k, 0, &[cpu]), Err(SysError::Os(EINVAL)));
        }
        // Valid entries still apply
        set_cpu_affinity(&k, 0, &[usize::MAX, 2]).unwrap();
        assert_eq!(get_cpu_affinity(&k, 0, AffinityStrategy::growable()), Ok(vec![2]));
    }

    #[test]
    fn test_affinity_strategy_is_clamped() {
        let k = FakeKernel::new(64, &[3]);
        // start above max: a single attempt at max
        let strategy = AffinityStrategy { start_cpus: 4096, max_cpus: 1024 };
        assert_eq!(get_cpu_affinity(&k, 0, strategy), Ok(vec![3]));
        assert_eq!(k.getaffinity_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_priority_round_trip() {
        let k = FakeKernel::new(64, &[0]);
        set_priority(&k, 0, 5).unwrap();
        assert_eq!(get_priority(&k, 0), Ok(5));
        assert_eq!(set_priority(&k, 0, -5), Err(SysError::Os(EPERM)));
        assert_eq!(get_priority(&k, 3), Err(SysError::Os(ESRCH)));
    }

    #[test]
    fn test_ionice_round_trip() {
        let k = FakeKernel::new(64, &[0]);
        set_ionice(&k, 0, IoClass::BestEffort.as_raw(), 6).unwrap();
        assert_eq!(get_ionice(&k, 0), Ok(IoPriority::new(2, 6)));

        set_ionice(&k, 0, IoClass::Idle.as_raw(), 0).unwrap();
        assert_eq!(get_ionice(&k, 0), Ok(IoPriority::new(3, 0)));

        assert_eq!(set_ionice(&k, 0, 5, 0), Err(SysError::Os(EINVAL)));
    }

    #[test]
    fn test_rlimit_ordering() {
        let k = FakeKernel::new(64, &[0]);
        let nofile = Resource::Nofile.as_raw();
        let limit = get_rlimit(&k, 0, nofile).unwrap();
        assert_eq!(limit, RLimit { soft: 1024, hard: 4096 });

        set_rlimit(&k, 0, nofile, RLimit::new(512, 2048)).unwrap();
        let limit = get_rlimit(&k, 0, nofile).unwrap();
        assert_eq!(limit.soft, 512);
        assert_eq!(limit.hard, 2048);

        // soft above hard
        assert_eq!(set_rlimit(&k, 0, nofile, RLimit::new(4096, 1024)), Err(SysError::Os(EINVAL)));
        // raising hard without privilege
        assert_eq!(
            set_rlimit(&k, 0, nofile, RLimit::new(512, RLIM_INFINITY)),
            Err(SysError::Os(EPERM))
        );
    }
}
