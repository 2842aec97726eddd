//! Task status vocabulary and the display classification table.
//!
//! Raw statuses come off the wire as strings; parsing is total and anything
//! unrecognized lands on [`TaskStatus::Unknown`]. Display classification is a
//! second vocabulary ([`DisplayStatus`]) refined from the raw status plus the
//! task end details, and the [`StatusTable`] maps every display status to a
//! `{category, label}` pair for rendering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw task status as reported by the build system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Unstarted,
    Undispatched,
    Dispatched,
    Started,
    Succeeded,
    Failed,
    SystemFailed,
    Unscheduled,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "unstarted" => Self::Unstarted,
            "undispatched" => Self::Undispatched,
            "dispatched" => Self::Dispatched,
            "started" => Self::Started,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "system-failed" => Self::SystemFailed,
            "unscheduled" => Self::Unscheduled,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unstarted => "unstarted",
            Self::Undispatched => "undispatched",
            Self::Dispatched => "dispatched",
            Self::Started => "started",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::SystemFailed => "system-failed",
            Self::Unscheduled => "unscheduled",
            Self::Unknown => "unknown",
        }
    }

    /// A task counts as in-flight while it is dispatched or started; its
    /// displayed duration then tracks the live clock rather than wall
    /// timestamps.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Started | Self::Dispatched)
    }
}

/// Status a task is displayed with after the activation override and the
/// failure-detail refinement have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayStatus {
    Unscheduled,
    Unstarted,
    Dispatched,
    Started,
    Succeeded,
    Failed,
    SystemFailed,
    SystemUnresponsive,
    SystemTimedOut,
    TestTimedOut,
    Unknown,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unscheduled => "unscheduled",
            Self::Unstarted => "unstarted",
            Self::Dispatched => "dispatched",
            Self::Started => "started",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::SystemFailed => "system-failed",
            Self::SystemUnresponsive => "system-unresponsive",
            Self::SystemTimedOut => "system-timed-out",
            Self::TestTimedOut => "test-timed-out",
            Self::Unknown => "unknown",
        }
    }
}

/// Rendering category and human-readable label for one display status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Display category, used by consumers as a CSS-class-style bucket.
    pub category: String,
    /// Human label shown in tooltips.
    pub label: String,
}

impl StatusEntry {
    fn new(category: &str, label: &str) -> Self {
        Self {
            category: category.to_string(),
            label: label.to_string(),
        }
    }
}

/// Total mapping from display status to `{category, label}`.
///
/// The table is injected configuration: consumers can override individual
/// entries, and lookups for statuses without an entry fall back to the
/// `unknown` entry so classification never fails.
#[derive(Debug, Clone)]
pub struct StatusTable {
    entries: HashMap<DisplayStatus, StatusEntry>,
    unknown: StatusEntry,
}

impl Default for StatusTable {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            DisplayStatus::Unscheduled,
            StatusEntry::new("undispatched", "not scheduled"),
        );
        entries.insert(
            DisplayStatus::Unstarted,
            StatusEntry::new("undispatched", "scheduled"),
        );
        entries.insert(
            DisplayStatus::Dispatched,
            StatusEntry::new("dispatched", "dispatched"),
        );
        entries.insert(
            DisplayStatus::Started,
            StatusEntry::new("started", "running"),
        );
        entries.insert(
            DisplayStatus::Succeeded,
            StatusEntry::new("success", "success"),
        );
        entries.insert(DisplayStatus::Failed, StatusEntry::new("failed", "failed"));
        entries.insert(
            DisplayStatus::SystemFailed,
            StatusEntry::new("system-failed", "system failure"),
        );
        entries.insert(
            DisplayStatus::SystemUnresponsive,
            StatusEntry::new("system-failed", "system unresponsive"),
        );
        entries.insert(
            DisplayStatus::SystemTimedOut,
            StatusEntry::new("system-failed", "system timed out"),
        );
        entries.insert(
            DisplayStatus::TestTimedOut,
            StatusEntry::new("failed", "test timed out"),
        );
        Self {
            entries,
            unknown: StatusEntry::new("unknown", "unknown"),
        }
    }
}

impl StatusTable {
    /// Replace the entry for one display status.
    pub fn with_entry(mut self, status: DisplayStatus, category: &str, label: &str) -> Self {
        self.entries.insert(status, StatusEntry::new(category, label));
        self
    }

    /// Look up the entry for a display status, falling back to `unknown`.
    pub fn lookup(&self, status: DisplayStatus) -> &StatusEntry {
        self.entries.get(&status).unwrap_or(&self.unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_total() {
        assert_eq!(TaskStatus::parse("succeeded"), TaskStatus::Succeeded);
        assert_eq!(TaskStatus::parse("system-failed"), TaskStatus::SystemFailed);
        assert_eq!(TaskStatus::parse("not-a-status"), TaskStatus::Unknown);
        assert_eq!(TaskStatus::parse(""), TaskStatus::Unknown);
    }

    #[test]
    fn test_parse_round_trips_as_str() {
        for status in [
            TaskStatus::Unstarted,
            TaskStatus::Undispatched,
            TaskStatus::Dispatched,
            TaskStatus::Started,
            TaskStatus::Succeeded,
            TaskStatus::Failed,
            TaskStatus::SystemFailed,
            TaskStatus::Unscheduled,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_in_flight_statuses() {
        assert!(TaskStatus::Started.is_in_flight());
        assert!(TaskStatus::Dispatched.is_in_flight());
        assert!(!TaskStatus::Succeeded.is_in_flight());
        assert!(!TaskStatus::Undispatched.is_in_flight());
    }

    #[test]
    fn test_table_lookup_is_total() {
        let table = StatusTable::default();
        for status in [
            DisplayStatus::Unscheduled,
            DisplayStatus::Unstarted,
            DisplayStatus::Dispatched,
            DisplayStatus::Started,
            DisplayStatus::Succeeded,
            DisplayStatus::Failed,
            DisplayStatus::SystemFailed,
            DisplayStatus::SystemUnresponsive,
            DisplayStatus::SystemTimedOut,
            DisplayStatus::TestTimedOut,
            DisplayStatus::Unknown,
        ] {
            let entry = table.lookup(status);
            assert!(!entry.category.is_empty());
            assert!(!entry.label.is_empty());
        }
        assert_eq!(table.lookup(DisplayStatus::Unknown).category, "unknown");
    }

    #[test]
    fn test_table_override() {
        let table = StatusTable::default().with_entry(DisplayStatus::Failed, "red", "broken");
        assert_eq!(table.lookup(DisplayStatus::Failed).category, "red");
        assert_eq!(table.lookup(DisplayStatus::Failed).label, "broken");
        assert_eq!(table.lookup(DisplayStatus::Succeeded).category, "success");
    }
}
