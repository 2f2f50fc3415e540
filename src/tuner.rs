//! Best-effort noise reduction, never a correctness requirement. Both
//! operations return `false` rather than an error when the OS refuses
//! the request.

/// Pin the calling thread to CPU 0, best-effort.
#[cfg(feature = "cli")]
pub fn pin_to_core_zero() -> bool {
    match core_affinity::get_core_ids() {
        Some(ids) if !ids.is_empty() => core_affinity::set_for_current(ids[0]),
        _ => false,
    }
}

#[cfg(not(feature = "cli"))]
pub fn pin_to_core_zero() -> bool {
    false
}

/// Request the realtime (FIFO) scheduling class for the calling process,
/// best-effort. Only attempted on Unix; a no-op (returns `false`) elsewhere
/// or if the OS denies the request (typically requires `CAP_SYS_NICE` or
/// root).
#[cfg(all(unix, feature = "cli"))]
pub fn request_realtime_priority() -> bool {
    // SAFETY: sched_setscheduler with SCHED_FIFO and a valid priority in
    // range is a well-defined syscall; failure is reported via errno and
    // mapped to `false` here rather than propagated, per the best-effort
    // contract above.
    unsafe {
        let priority = libc::sched_get_priority_min(libc::SCHED_FIFO);
        if priority < 0 {
            return false;
        }
        let param = libc::sched_param {
            sched_priority: priority,
        };
        libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) == 0
    }
}

#[cfg(not(all(unix, feature = "cli")))]
pub fn request_realtime_priority() -> bool {
    false
}
