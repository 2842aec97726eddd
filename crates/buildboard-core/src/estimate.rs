//! Duration estimator: per-task elapsed time in nanoseconds.

use chrono::{DateTime, Utc};

use crate::model::{Task, is_epoch};

/// Wire timestamps carry millisecond granularity; derived durations are
/// nanoseconds.
pub const NANOS_PER_MILLI: i64 = 1_000_000;

/// Estimate the elapsed nanoseconds for one task.
///
/// In-flight tasks track the live reference clock so their displayed bar
/// grows between refreshes; everything else uses the wall delta between
/// start and finish so display tasks show wall-clock time rather than raw
/// "time taken" accounting.
///
/// For in-flight tasks with an unset clock or start time the estimate is
/// unknowable and comes back 0. For other tasks the delta is computed even
/// when a bound is unset; the aggregator filters such values out of the
/// makespan and total-processing metrics instead of this function guessing.
pub fn estimate_duration(task: &Task, current_time: DateTime<Utc>) -> i64 {
    if task.status.is_in_flight() {
        if is_epoch(current_time) || is_epoch(task.start_time) {
            return 0;
        }
        return (current_time - task.start_time).num_milliseconds() * NANOS_PER_MILLI;
    }
    (task.finish_time - task.start_time).num_milliseconds() * NANOS_PER_MILLI
}

/// Build-level elapsed time: finish minus start once finished, current minus
/// start while still running, 0 before the build starts.
pub fn finish_conditional(
    start_time: DateTime<Utc>,
    finish_time: DateTime<Utc>,
    current_time: DateTime<Utc>,
) -> i64 {
    if is_epoch(start_time) {
        return 0;
    }
    let end = if is_epoch(finish_time) {
        current_time
    } else {
        finish_time
    };
    (end - start_time).num_milliseconds() * NANOS_PER_MILLI
}
