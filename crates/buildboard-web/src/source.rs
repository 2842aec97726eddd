//! Snapshot sources: where build/task JSON comes from.
//!
//! The aggregation core never fetches anything itself; it is handed one
//! parsed snapshot at a time. A source produces those snapshots, either from
//! the upstream build system over HTTP or from memory in tests and demos.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use buildboard_core::BuildSnapshot;

/// Wire payload for one build: the current snapshot plus an optional
/// last-successful-build baseline of the same shape.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotPayload {
    pub build: BuildSnapshot,
    #[serde(default)]
    pub last_success: Option<BuildSnapshot>,
}

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, build_id: &str) -> Result<SnapshotPayload>;
}

/// HTTP source reading snapshot JSON from the build system.
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSnapshotSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self, build_id: &str) -> Result<SnapshotPayload> {
        let url = format!("{}/json/build/{}", self.base_url, build_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("fetch {url}"))?;
        if !response.status().is_success() {
            anyhow::bail!(
                "upstream returned {} for build {}",
                response.status(),
                build_id
            );
        }
        let bytes = response.bytes().await.context("read snapshot body")?;
        let payload: SnapshotPayload =
            serde_json::from_slice(&bytes).context("decode snapshot payload")?;
        payload.build.validate()?;
        if let Some(last_success) = &payload.last_success {
            last_success.validate()?;
        }
        Ok(payload)
    }
}

/// In-memory source keyed by build id, for tests and demos.
#[derive(Default)]
pub struct StaticSource {
    payloads: Mutex<HashMap<String, SnapshotPayload>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, payload: SnapshotPayload) {
        self.payloads
            .lock()
            .await
            .insert(payload.build.build_id.clone(), payload);
    }
}

#[async_trait]
impl SnapshotSource for StaticSource {
    async fn fetch(&self, build_id: &str) -> Result<SnapshotPayload> {
        self.payloads
            .lock()
            .await
            .get(build_id)
            .cloned()
            .with_context(|| format!("no snapshot for build {build_id}"))
    }
}
