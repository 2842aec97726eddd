//! Build summarizer: whole-build reduction over one snapshot.

use chrono::{DateTime, Utc};

use crate::classify::classify;
use crate::estimate::{NANOS_PER_MILLI, estimate_duration, finish_conditional};
use crate::model::{BuildReport, BuildSnapshot, BuildSummary, StatusCounts, Task, is_epoch};
use crate::status::StatusTable;

/// Reduce one snapshot to per-task display records and a build-wide summary.
///
/// Pure over the snapshot: repeated calls with the same input produce
/// identical output. Callers rerun it wholesale on every fresh snapshot and
/// replace whatever they rendered before.
pub fn summarize(snapshot: &BuildSnapshot, table: &StatusTable) -> BuildReport {
    // Floor of 1 keeps "percent of max" consumers away from a zero
    // denominator.
    let mut max_task_duration_nanos = 1i64;
    let mut tasks = Vec::with_capacity(snapshot.tasks.len());
    let mut counts = StatusCounts::default();

    for task in &snapshot.tasks {
        let nanos = estimate_duration(task, snapshot.current_time);
        // The max scan takes the raw estimate unfiltered; a finished task
        // with an unset start can push an epoch-sized value in here.
        if nanos > max_task_duration_nanos {
            max_task_duration_nanos = nanos;
        }
        counts.record(task.result_status());
        let mut display = classify(task, table);
        display.estimated_duration_nanos = nanos.max(0);
        tasks.push(display);
    }

    BuildReport {
        build_id: snapshot.build_id.clone(),
        tasks,
        summary: BuildSummary {
            max_task_duration_nanos,
            makespan_nanos: makespan_nanos(&snapshot.tasks),
            total_processing_nanos: total_processing_nanos(&snapshot.tasks),
            build_time_taken_nanos: finish_conditional(
                snapshot.start_time,
                snapshot.finish_time,
                snapshot.current_time,
            ),
        },
        counts,
    }
}

/// Wall-clock span from the earliest task start to the latest task finish.
///
/// Starts and finishes are collected independently and epoch-zero values
/// dropped from each, so a task that never started contributes no start and
/// one still running contributes no finish. With either side empty there is
/// no measurable span yet.
fn makespan_nanos(tasks: &[Task]) -> i64 {
    let starts = sorted_non_epoch(tasks.iter().map(|t| t.start_time));
    let finishes = sorted_non_epoch(tasks.iter().map(|t| t.finish_time));
    match (starts.first(), finishes.last()) {
        (Some(first_start), Some(last_finish)) => {
            (*last_finish - *first_start).num_milliseconds() * NANOS_PER_MILLI
        }
        _ => 0,
    }
}

/// Sum of wall durations over tasks whose start and finish are both set.
/// In-flight tasks get no partial credit here, unlike the per-task live
/// estimate.
fn total_processing_nanos(tasks: &[Task]) -> i64 {
    tasks
        .iter()
        .filter(|t| !is_epoch(t.start_time) && !is_epoch(t.finish_time))
        .map(|t| (t.finish_time - t.start_time).num_milliseconds() * NANOS_PER_MILLI)
        .sum()
}

fn sorted_non_epoch(times: impl Iterator<Item = DateTime<Utc>>) -> Vec<DateTime<Utc>> {
    let mut times: Vec<_> = times.filter(|ts| !is_epoch(*ts)).collect();
    times.sort();
    times
}
