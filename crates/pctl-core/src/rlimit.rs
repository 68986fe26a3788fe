//! Resource limits
//!
//! `soft` is always the currently enforced value (`rlim_cur`) and `hard`
//! the ceiling (`rlim_max`), for both reading and writing.

/// Value the kernel uses for "no limit"
pub const RLIM_INFINITY: u64 = u64::MAX;

/// Limited resource, numbered as in `<sys/resource.h>` on Linux
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Cpu = 0,
    Fsize = 1,
    Data = 2,
    Stack = 3,
    Core = 4,
    Rss = 5,
    Nproc = 6,
    Nofile = 7,
    Memlock = 8,
    As = 9,
    Locks = 10,
    Sigpending = 11,
    Msgqueue = 12,
    Nice = 13,
    Rtprio = 14,
    Rttime = 15,
}

impl Resource {
    pub const ALL: [Resource; 16] = [
        Resource::Cpu,
        Resource::Fsize,
        Resource::Data,
        Resource::Stack,
        Resource::Core,
        Resource::Rss,
        Resource::Nproc,
        Resource::Nofile,
        Resource::Memlock,
        Resource::As,
        Resource::Locks,
        Resource::Sigpending,
        Resource::Msgqueue,
        Resource::Nice,
        Resource::Rtprio,
        Resource::Rttime,
    ];

    pub fn from_raw(v: i32) -> Option<Self> {
        usize::try_from(v).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    #[inline]
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Resource::Cpu => "RLIMIT_CPU",
            Resource::Fsize => "RLIMIT_FSIZE",
            Resource::Data => "RLIMIT_DATA",
            Resource::Stack => "RLIMIT_STACK",
            Resource::Core => "RLIMIT_CORE",
            Resource::Rss => "RLIMIT_RSS",
            Resource::Nproc => "RLIMIT_NPROC",
            Resource::Nofile => "RLIMIT_NOFILE",
            Resource::Memlock => "RLIMIT_MEMLOCK",
            Resource::As => "RLIMIT_AS",
            Resource::Locks => "RLIMIT_LOCKS",
            Resource::Sigpending => "RLIMIT_SIGPENDING",
            Resource::Msgqueue => "RLIMIT_MSGQUEUE",
            Resource::Nice => "RLIMIT_NICE",
            Resource::Rtprio => "RLIMIT_RTPRIO",
            Resource::Rttime => "RLIMIT_RTTIME",
        }
    }
}

/// A (soft, hard) limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RLimit {
    /// Currently enforced (`rlim_cur`)
    pub soft: u64,
    /// Ceiling the soft limit may be raised to (`rlim_max`)
    pub hard: u64,
}

impl RLimit {
    pub const fn new(soft: u64, hard: u64) -> Self {
        Self { soft, hard }
    }

    pub const fn unlimited() -> Self {
        Self::new(RLIM_INFINITY, RLIM_INFINITY)
    }

    /// The kernel rejects a soft limit above the hard limit
    #[inline]
    pub const fn is_consistent(&self) -> bool {
        self.soft <= self.hard
    }
}
