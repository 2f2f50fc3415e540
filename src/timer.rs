//! A monotonic hardware tick counter with single-cycle resolution on
//! platforms that expose one, falling back to a coarser monotonic source
//! elsewhere.

use crate::types::Tick;

/// Read the current cycle counter. On x86_64 this is the CPU's time-stamp
/// counter (`RDTSC`), single-cycle resolution. On other architectures it
/// falls back to a nanosecond-resolution monotonic clock, which is not
/// cycle-accurate but preserves the monotonic, high-resolution property the
/// measurement loop relies on.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub fn cycles() -> Tick {
    // SAFETY: RDTSC is available on every x86_64 CPU; no privilege or
    // feature-detection is required to execute it.
    unsafe { core::arch::x86_64::_rdtsc() }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub fn cycles() -> Tick {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_nanos() as Tick
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_monotonic_nondecreasing() {
        let a = cycles();
        // burn a handful of cycles so the two reads can't tie on a coarse clock
        for _ in 0..64 {
            std::hint::black_box(());
        }
        let b = cycles();
        assert!(b >= a);
    }
}
