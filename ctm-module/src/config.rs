//! Run-time switches.

use core::sync::atomic::{AtomicBool, Ordering};

static MULTITHREAD: AtomicBool = AtomicBool::new(true);

/// Whether `tensor` and `reduce` fan out to the rayon pool. 
/// Always `false` when built without the `multithread` feature.
pub fn is_multithread_enabled() -> bool {
    cfg!(feature = "multithread") && MULTITHREAD.load(Ordering::Relaxed)
}

pub fn set_multithread_enabled(val: bool) {
    MULTITHREAD.store(val, Ordering::Relaxed)
}
