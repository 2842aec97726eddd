pub mod classify;
pub mod config;
pub mod error;
pub mod estimate;
pub mod model;
pub mod status;
pub mod summarize;

pub use classify::classify;
pub use config::DashboardConfig;
pub use error::{SnapshotError, SnapshotResult};
pub use estimate::{estimate_duration, finish_conditional};
pub use model::{
    BuildReport, BuildSnapshot, BuildSummary, StatusCounts, Task, TaskDisplay, TaskEndDetails,
};
pub use status::{DisplayStatus, StatusEntry, StatusTable, TaskStatus};
pub use summarize::summarize;
