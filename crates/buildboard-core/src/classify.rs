//! Task classifier: raw task to display record.

use crate::model::{Task, TaskDisplay};
use crate::status::StatusTable;

/// Classify one task for display.
///
/// Total over any task value: the activation override and failure refinement
/// happen in [`Task::result_status`], and the table lookup falls back to its
/// unknown entry, so classification never fails. The link is built from the
/// task id without checking it resolves; broken links are a caller concern.
pub fn classify(task: &Task, table: &StatusTable) -> TaskDisplay {
    let entry = table.lookup(task.result_status());
    TaskDisplay {
        task_id: task.id.clone(),
        classification: entry.category.clone(),
        tooltip: format!("{} - {}", task.display_name, entry.label),
        link: format!("/task/{}", task.id),
        estimated_duration_nanos: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::TaskStatus;
    use chrono::DateTime;

    fn sample_task(status: TaskStatus, activated: bool) -> Task {
        Task {
            id: "task-123".to_string(),
            display_name: "lint".to_string(),
            status,
            activated,
            start_time: DateTime::UNIX_EPOCH,
            finish_time: DateTime::UNIX_EPOCH,
            details: None,
        }
    }

    #[test]
    fn test_unactivated_overrides_raw_status() {
        let table = StatusTable::default();
        let display = classify(&sample_task(TaskStatus::Failed, false), &table);
        assert_eq!(display.classification, "undispatched");
        assert_eq!(display.tooltip, "lint - not scheduled");
    }

    #[test]
    fn test_activated_failed_task() {
        let table = StatusTable::default();
        let display = classify(&sample_task(TaskStatus::Failed, true), &table);
        assert_eq!(display.classification, "failed");
        assert_eq!(display.tooltip, "lint - failed");
    }

    #[test]
    fn test_link_is_built_from_task_id() {
        let table = StatusTable::default();
        let display = classify(&sample_task(TaskStatus::Succeeded, true), &table);
        assert_eq!(display.link, "/task/task-123");
        assert_eq!(display.task_id, "task-123");
    }

    #[test]
    fn test_unknown_status_degrades() {
        let table = StatusTable::default();
        let display = classify(&sample_task(TaskStatus::Unknown, true), &table);
        assert_eq!(display.classification, "unknown");
        assert_eq!(display.tooltip, "lint - unknown");
    }
}
