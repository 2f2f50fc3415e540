//! An optional, off-by-default pass that writes zeros over a buffer sized
//! to the largest data cache, to force cold-cache timing on the next
//! measurement. Never on the critical path unless a caller explicitly
//! enables it in `Config`.

/// Fallback buffer size when cache geometry can't be probed: 2 MiB, larger
/// than a typical L2 and in the range of a modest L3 slice.
pub const DEFAULT_SCRUB_BYTES: usize = 2 * 1024 * 1024;

/// Probe the largest data-cache level's size in bytes via the x86 CPUID
/// extended cache-info leaf (0x8000_0006, L2/L3 descriptor). Falls back to
/// [`DEFAULT_SCRUB_BYTES`] if the leaf is unsupported or yields nonsense.
#[cfg(target_arch = "x86_64")]
pub fn probe_cache_bytes() -> usize {
    // SAFETY: CPUID is always available on x86_64; leaf 0x8000_0006 is
    // either supported (and returns real data) or returns all zeros on CPUs
    // that don't implement it, which the sanity check below filters out.
    let max_extended = unsafe { core::arch::x86_64::__cpuid(0x8000_0000) }.eax;
    if max_extended < 0x8000_0006 {
        return DEFAULT_SCRUB_BYTES;
    }

    let leaf = unsafe { core::arch::x86_64::__cpuid(0x8000_0006) };
    // ecx[31:16] = L2 cache size in KiB.
    let l2_kib = (leaf.ecx >> 16) & 0xFFFF;
    if l2_kib == 0 {
        DEFAULT_SCRUB_BYTES
    } else {
        l2_kib as usize * 1024
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn probe_cache_bytes() -> usize {
    DEFAULT_SCRUB_BYTES
}

/// Writes zeros across a buffer of the given size, evicting data from every
/// cache level up to that size. Uses `std::hint::black_box` so the compiler
/// can't prove the write is dead and elide it.
pub struct CacheScrubber {
    buf: Vec<u8>,
}

impl CacheScrubber {
    /// Build a scrubber sized via [`probe_cache_bytes`].
    pub fn new() -> Self {
        Self::with_size(probe_cache_bytes())
    }

    /// Build a scrubber with an explicit buffer size (for configuration
    /// overrides or tests).
    pub fn with_size(bytes: usize) -> Self {
        Self {
            buf: vec![0u8; bytes],
        }
    }

    /// Evict caches by writing zeros across the whole buffer.
    #[inline]
    pub fn scrub(&mut self) {
        for byte in self.buf.iter_mut() {
            *byte = std::hint::black_box(0);
        }
    }
}

impl Default for CacheScrubber {
    fn default() -> Self {
        Self::new()
    }
}
