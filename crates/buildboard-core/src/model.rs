//! Build and task snapshot models plus the derived report types.
//!
//! Wire timestamps are epoch milliseconds; an epoch-zero value means the task
//! never reached that phase. All derived durations are nanoseconds to match
//! the build-level time unit.

use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, SnapshotResult};
use crate::status::{DisplayStatus, TaskStatus};

/// Epoch zero stands for "unset" throughout the snapshot model.
pub fn is_epoch(ts: DateTime<Utc>) -> bool {
    ts.timestamp_millis() == 0
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Extra detail reported when a task ends, used to refine failure display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskEndDetails {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub description: String,
}

/// One task in a build snapshot, read-only input to the aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub display_name: String,
    pub status: TaskStatus,
    pub activated: bool,
    #[serde(with = "ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub finish_time: DateTime<Utc>,
    #[serde(default)]
    pub details: Option<TaskEndDetails>,
}

impl Task {
    /// Status the task should be displayed with.
    ///
    /// An unactivated task is always unscheduled, whatever its raw status
    /// says. Failures are refined through the end details: a system failure
    /// that timed out becomes unresponsive (heartbeat) or timed-out, and a
    /// non-system timeout becomes a test timeout.
    pub fn result_status(&self) -> DisplayStatus {
        if !self.activated {
            return DisplayStatus::Unscheduled;
        }
        match self.status {
            TaskStatus::Unscheduled => DisplayStatus::Unscheduled,
            TaskStatus::Unstarted | TaskStatus::Undispatched => DisplayStatus::Unstarted,
            TaskStatus::Dispatched => DisplayStatus::Dispatched,
            TaskStatus::Started => DisplayStatus::Started,
            TaskStatus::Succeeded => DisplayStatus::Succeeded,
            TaskStatus::SystemFailed => DisplayStatus::SystemFailed,
            TaskStatus::Failed => self.failure_status(),
            TaskStatus::Unknown => DisplayStatus::Unknown,
        }
    }

    fn failure_status(&self) -> DisplayStatus {
        let Some(details) = &self.details else {
            return DisplayStatus::Failed;
        };
        if details.kind == "system" {
            if details.timed_out {
                if details.description == "heartbeat" {
                    return DisplayStatus::SystemUnresponsive;
                }
                return DisplayStatus::SystemTimedOut;
            }
            return DisplayStatus::SystemFailed;
        }
        if details.timed_out {
            return DisplayStatus::TestTimedOut;
        }
        DisplayStatus::Failed
    }
}

/// One immutable copy of build+task state at a point in time, the unit of
/// aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSnapshot {
    pub build_id: String,
    pub tasks: Vec<Task>,
    /// Reference clock for in-flight duration estimates.
    #[serde(with = "ts_milliseconds")]
    pub current_time: DateTime<Utc>,
    /// Build-level bounds; epoch zero while the build has not reached the
    /// phase.
    #[serde(default = "unix_epoch", with = "ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(default = "unix_epoch", with = "ts_milliseconds")]
    pub finish_time: DateTime<Utc>,
}

impl BuildSnapshot {
    /// Decode a snapshot from wire JSON and validate it.
    pub fn from_slice(bytes: &[u8]) -> SnapshotResult<Self> {
        let snapshot: Self = serde_json::from_slice(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Cheap structural validation; an epoch-zero reference clock is legal
    /// but makes in-flight estimates unknowable, so it is worth a warning.
    pub fn validate(&self) -> SnapshotResult<()> {
        if self.build_id.is_empty() {
            return Err(SnapshotError::MissingBuildId);
        }
        if is_epoch(self.current_time) {
            tracing::warn!(
                build_id = %self.build_id,
                "snapshot has no current_time reference; in-flight estimates will be zero"
            );
        }
        Ok(())
    }
}

/// Derived display record for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDisplay {
    pub task_id: String,
    pub classification: String,
    pub tooltip: String,
    pub link: String,
    /// Estimated elapsed nanoseconds; 0 when unknowable.
    pub estimated_duration_nanos: i64,
}

/// Build-wide timing summary derived from one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Longest observed task duration; floored at 1 so consumers can divide
    /// by it.
    pub max_task_duration_nanos: i64,
    /// Earliest task start to latest task finish, epoch-zero bounds ignored.
    pub makespan_nanos: i64,
    /// Sum of wall durations over tasks with both bounds set.
    pub total_processing_nanos: i64,
    /// Build-level elapsed time, tracking the live clock while unfinished.
    pub build_time_taken_nanos: i64,
}

/// Tally of tasks per display status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: u32,
    pub unscheduled: u32,
    pub unstarted: u32,
    pub dispatched: u32,
    pub started: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub system_failed: u32,
    pub system_unresponsive: u32,
    pub system_timed_out: u32,
    pub test_timed_out: u32,
    pub unknown: u32,
}

impl StatusCounts {
    pub fn record(&mut self, status: DisplayStatus) {
        self.total += 1;
        match status {
            DisplayStatus::Unscheduled => self.unscheduled += 1,
            DisplayStatus::Unstarted => self.unstarted += 1,
            DisplayStatus::Dispatched => self.dispatched += 1,
            DisplayStatus::Started => self.started += 1,
            DisplayStatus::Succeeded => self.succeeded += 1,
            DisplayStatus::Failed => self.failed += 1,
            DisplayStatus::SystemFailed => self.system_failed += 1,
            DisplayStatus::SystemUnresponsive => self.system_unresponsive += 1,
            DisplayStatus::SystemTimedOut => self.system_timed_out += 1,
            DisplayStatus::TestTimedOut => self.test_timed_out += 1,
            DisplayStatus::Unknown => self.unknown += 1,
        }
    }
}

/// Full derived output for one snapshot: per-task displays in input order
/// plus the build-wide reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub build_id: String,
    pub tasks: Vec<TaskDisplay>,
    pub summary: BuildSummary,
    pub counts: StatusCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task(status: TaskStatus, activated: bool) -> Task {
        Task {
            id: "t1".to_string(),
            display_name: "compile".to_string(),
            status,
            activated,
            start_time: DateTime::UNIX_EPOCH,
            finish_time: DateTime::UNIX_EPOCH,
            details: None,
        }
    }

    #[test]
    fn test_unactivated_task_is_unscheduled() {
        let task = sample_task(TaskStatus::Failed, false);
        assert_eq!(task.result_status(), DisplayStatus::Unscheduled);
    }

    #[test]
    fn test_failure_refinement() {
        let mut task = sample_task(TaskStatus::Failed, true);
        assert_eq!(task.result_status(), DisplayStatus::Failed);

        task.details = Some(TaskEndDetails {
            kind: "system".to_string(),
            timed_out: false,
            description: String::new(),
        });
        assert_eq!(task.result_status(), DisplayStatus::SystemFailed);

        task.details = Some(TaskEndDetails {
            kind: "system".to_string(),
            timed_out: true,
            description: "heartbeat".to_string(),
        });
        assert_eq!(task.result_status(), DisplayStatus::SystemUnresponsive);

        task.details = Some(TaskEndDetails {
            kind: "system".to_string(),
            timed_out: true,
            description: "exec timeout".to_string(),
        });
        assert_eq!(task.result_status(), DisplayStatus::SystemTimedOut);

        task.details = Some(TaskEndDetails {
            kind: "test".to_string(),
            timed_out: true,
            description: String::new(),
        });
        assert_eq!(task.result_status(), DisplayStatus::TestTimedOut);
    }

    #[test]
    fn test_snapshot_decodes_wire_json() {
        let raw = r#"{
            "build_id": "b1",
            "current_time": 1700000003000,
            "tasks": [
                {
                    "id": "t1",
                    "display_name": "compile",
                    "status": "succeeded",
                    "activated": true,
                    "start_time": 1700000000000,
                    "finish_time": 1700000002000
                }
            ]
        }"#;
        let snapshot = BuildSnapshot::from_slice(raw.as_bytes()).expect("decode");
        assert_eq!(snapshot.build_id, "b1");
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].status, TaskStatus::Succeeded);
        assert_eq!(
            snapshot.tasks[0].start_time,
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
        );
        assert!(is_epoch(snapshot.start_time));
    }

    #[test]
    fn test_snapshot_unknown_status_degrades() {
        let raw = r#"{
            "build_id": "b1",
            "current_time": 1700000003000,
            "tasks": [
                {
                    "id": "t1",
                    "display_name": "compile",
                    "status": "some-future-status",
                    "activated": true,
                    "start_time": 0,
                    "finish_time": 0
                }
            ]
        }"#;
        let snapshot = BuildSnapshot::from_slice(raw.as_bytes()).expect("decode");
        assert_eq!(snapshot.tasks[0].status, TaskStatus::Unknown);
        assert_eq!(snapshot.tasks[0].result_status(), DisplayStatus::Unknown);
    }

    #[test]
    fn test_snapshot_rejects_empty_build_id() {
        let raw = r#"{"build_id": "", "current_time": 0, "tasks": []}"#;
        let err = BuildSnapshot::from_slice(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, SnapshotError::MissingBuildId));
    }

    #[test]
    fn test_snapshot_rejects_malformed_json() {
        let err = BuildSnapshot::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
    }
}
