use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Millisecond Unix timestamp as a decimal string.
///
/// Ids handed out by one process are strictly increasing: a second call in
/// the same millisecond gets the next integer instead of a duplicate.
pub fn time_id() -> String {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}
