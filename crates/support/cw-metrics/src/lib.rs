//! Process-wide wall-time counters for external I/O.
//!
//! Two monotonic counters track the cumulative time spent in object-store
//! calls (LIST and ranged GET) and cache calls (SET), summed across all
//! workers. The adapters record into them on every call, success or failure;
//! the engine reports the totals in whole seconds when a run terminates.
//! Diagnostic only - nothing reads these to make decisions.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static OBJECT_STORE_MILLIS: AtomicI64 = AtomicI64::new(0);
static CACHE_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Add an object-store call's elapsed wall time to the running total.
pub fn record_object_store(elapsed: Duration) {
    OBJECT_STORE_MILLIS.fetch_add(elapsed.as_millis() as i64, Ordering::Relaxed);
}

/// Add a cache call's elapsed wall time to the running total.
pub fn record_cache(elapsed: Duration) {
    CACHE_MILLIS.fetch_add(elapsed.as_millis() as i64, Ordering::Relaxed);
}

/// Total sequential object-store time in whole seconds.
pub fn object_store_total_secs() -> i64 {
    OBJECT_STORE_MILLIS.load(Ordering::Relaxed) / 1000
}

/// Total sequential cache time in whole seconds.
pub fn cache_total_secs() -> i64 {
    CACHE_MILLIS.load(Ordering::Relaxed) / 1000
}
