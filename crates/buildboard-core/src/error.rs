use thiserror::Error;

/// Boundary errors for decoding wire snapshots. The aggregation itself is
/// total and never fails.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to decode build snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("build snapshot has an empty build id")]
    MissingBuildId,
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
