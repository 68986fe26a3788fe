//! Growable CPU affinity bitset
//!
//! Laid out as an array of native `unsigned long` words, which is the
//! layout `sched_getaffinity(2)` and `sched_setaffinity(2)` read and write.
//! Capacity is always a whole number of words, like `CPU_ALLOC_SIZE`, and
//! is fixed at construction: indices past it are ignored, as `CPU_SET_S`
//! ignores them.

/// Number of bits per word (`unsigned long` on Linux)
pub const BITS_PER_WORD: usize = usize::BITS as usize;

/// Width of glibc's static `cpu_set_t`
pub const CPU_SETSIZE: usize = 1024;

/// Set of CPU indices a process may run on
#[derive(Clone, PartialEq, Eq)]
pub struct CpuSet {
    /// Bit `n` of word `n / BITS_PER_WORD` is CPU `n`
    words: Vec<usize>,
}

impl CpuSet {
    /// Create an empty set able to hold `ncpus` CPUs
    ///
    /// Rounded up to whole words; never smaller than one word.
    pub fn with_capacity(ncpus: usize) -> Self {
        let num_words = words_for(ncpus).max(1);
        Self {
            words: vec![0; num_words],
        }
    }

    /// Build a set of width `ncpus` from a list of CPU indices
    ///
    /// Duplicates are idempotent. Indices at or past the capacity are
    /// dropped.
    pub fn from_cpus(cpus: &[usize], ncpus: usize) -> Self {
        let mut set = Self::with_capacity(ncpus);
        for &cpu in cpus {
            set.set(cpu);
        }
        set
    }

    /// Number of CPUs this set can describe
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len() * BITS_PER_WORD
    }

    /// Size in bytes, as passed to the kernel
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.words.len() * core::mem::size_of::<usize>()
    }

    /// Mark a CPU as allowed
    ///
    /// Returns `false` and leaves the set unchanged when `cpu` is past the
    /// capacity.
    pub fn set(&mut self, cpu: usize) -> bool {
        match self.words.get_mut(cpu / BITS_PER_WORD) {
            Some(word) => {
                *word |= 1usize << (cpu % BITS_PER_WORD);
                true
            }
            None => false,
        }
    }

    /// Remove a CPU from the set
    pub fn clear(&mut self, cpu: usize) {
        let word_idx = cpu / BITS_PER_WORD;
        if let Some(word) = self.words.get_mut(word_idx) {
            *word &= !(1usize << (cpu % BITS_PER_WORD));
        }
    }

    /// Check if a CPU is in the set
    #[inline]
    pub fn is_set(&self, cpu: usize) -> bool {
        let word_idx = cpu / BITS_PER_WORD;
        match self.words.get(word_idx) {
            Some(word) => word & (1usize << (cpu % BITS_PER_WORD)) != 0,
            None => false,
        }
    }

    /// Number of CPUs in the set (`CPU_COUNT_S`)
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Reset every bit without changing capacity
    pub fn zero(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Iterate set CPU indices in ascending order
    pub fn iter(&self) -> CpuIter<'_> {
        CpuIter {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Materialize the set as an ascending list
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// Raw words, for handing to the kernel
    #[inline]
    pub fn as_words(&self) -> &[usize] {
        &self.words
    }

    #[inline]
    pub fn as_words_mut(&mut self) -> &mut [usize] {
        &mut self.words
    }
}

/// Words needed for `ncpus` bits, without overflowing near `usize::MAX`
#[inline]
fn words_for(ncpus: usize) -> usize {
    ncpus / BITS_PER_WORD + usize::from(ncpus % BITS_PER_WORD != 0)
}

impl core::fmt::Debug for CpuSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Ascending iterator over the CPUs in a [`CpuSet`]
pub struct CpuIter<'a> {
    words: &'a [usize],
    word_idx: usize,
    current: usize,
}

impl Iterator for CpuIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                // Lowest set bit
                let bit_idx = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * BITS_PER_WORD + bit_idx);
            }
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
    }
}
