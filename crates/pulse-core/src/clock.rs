//! Wall-clock capture for production callers
//!
//! Every gating and economy operation takes `now_ms` explicitly; this module
//! is the single place production code converts wall time into that argument.

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Milliseconds remaining until `deadline_ms`, clamped at zero.
pub fn remaining_ms(deadline_ms: i64, now_ms: i64) -> i64 {
    (deadline_ms - now_ms).max(0)
}

/// Round milliseconds up to whole seconds for user-facing wait times.
///
/// A 1 ms residual block must still be reported as a 1 s wait; truncation
/// would tell the client to retry immediately while it is still blocked.
pub fn ms_to_secs_ceil(ms: i64) -> i64 {
    if ms <= 0 {
        0
    } else {
        (ms + 999) / 1000
    }
}
