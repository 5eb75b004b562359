use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU32, Ordering};

/// A process-wide counter which is initialized at 1.
static GLOBAL_REQUEST_ID_COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(1));

/// Returns the next aggregated request id. Wraps around on overflow.
#[inline]
pub fn increment_u32_id() -> u32 {
    GLOBAL_REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}
