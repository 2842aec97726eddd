use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

use buildboard_core::{BuildReport, BuildSummary, StatusCounts, StatusTable, summarize};

use crate::realtime::websocket_handler;
use crate::source::SnapshotSource;

pub fn fmt_time(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Update pushed to websocket subscribers whenever a build is re-summarized.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateUpdate {
    BuildUpdated {
        build_id: String,
        summary: BuildSummary,
        counts: StatusCounts,
        last_update: String,
    },
}

/// Last-rendered state for one build. Replaced wholesale on every refresh;
/// nothing in here is patched incrementally.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedBuild {
    pub report: BuildReport,
    pub last_success: Option<BuildReport>,
    pub last_update: String,
}

#[derive(Clone)]
pub struct ApiServer {
    source: Arc<dyn SnapshotSource>,
    table: Arc<StatusTable>,
    reports: Arc<RwLock<HashMap<String, RenderedBuild>>>,
    pub(crate) broadcast_tx: broadcast::Sender<StateUpdate>,
}

impl ApiServer {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        table: StatusTable,
        broadcast_capacity: usize,
    ) -> Self {
        let (broadcast_tx, _) = broadcast::channel(broadcast_capacity);
        Self {
            source,
            table: Arc::new(table),
            reports: Arc::new(RwLock::new(HashMap::new())),
            broadcast_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateUpdate> {
        self.broadcast_tx.subscribe()
    }

    /// Fetch a fresh snapshot, run the full summarization pass over it, and
    /// replace the cached rendered state (last write wins). Subscribers get
    /// a build-updated push on every pass.
    pub async fn refresh_build(&self, build_id: &str) -> anyhow::Result<RenderedBuild> {
        let payload = self.source.fetch(build_id).await?;
        let report = summarize(&payload.build, &self.table);
        let last_success = payload
            .last_success
            .as_ref()
            .map(|snapshot| summarize(snapshot, &self.table));
        let rendered = RenderedBuild {
            report,
            last_success,
            last_update: fmt_time(Utc::now()),
        };
        self.reports
            .write()
            .await
            .insert(build_id.to_string(), rendered.clone());
        let _ = self.broadcast_tx.send(StateUpdate::BuildUpdated {
            build_id: rendered.report.build_id.clone(),
            summary: rendered.report.summary,
            counts: rendered.report.counts,
            last_update: rendered.last_update.clone(),
        });
        tracing::debug!(build_id, "refreshed build report");
        Ok(rendered)
    }

    pub async fn serve(self, addr: SocketAddr) -> JoinHandle<()> {
        let router = build_router(self);
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .expect("bind address");
            axum::serve(listener, router).await.expect("server error");
        })
    }
}

pub fn build_router(api: ApiServer) -> Router {
    let cors = tower_http::cors::CorsLayer::very_permissive();
    Router::new()
        .route("/api/builds/{id}", get(build_detail))
        .route("/api/builds/{id}/summary", get(build_summary))
        .route("/api/builds/{id}/refresh", post(refresh_build))
        .route("/ws", get(websocket_handler))
        .with_state(api)
        .layer(cors)
}

async fn build_detail(
    Path(build_id): Path<String>,
    State(api): State<ApiServer>,
) -> impl IntoResponse {
    match api.refresh_build(&build_id).await {
        Ok(rendered) => Json(rendered).into_response(),
        Err(err) => (StatusCode::BAD_GATEWAY, err.to_string()).into_response(),
    }
}

#[derive(Serialize)]
struct SummaryResponse {
    build_id: String,
    summary: BuildSummary,
    counts: StatusCounts,
    last_update: String,
}

async fn build_summary(
    Path(build_id): Path<String>,
    State(api): State<ApiServer>,
) -> impl IntoResponse {
    match api.reports.read().await.get(&build_id) {
        Some(rendered) => Json(SummaryResponse {
            build_id: rendered.report.build_id.clone(),
            summary: rendered.report.summary,
            counts: rendered.report.counts,
            last_update: rendered.last_update.clone(),
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn refresh_build(
    Path(build_id): Path<String>,
    State(api): State<ApiServer>,
) -> impl IntoResponse {
    match api.refresh_build(&build_id).await {
        Ok(rendered) => Json(SummaryResponse {
            build_id: rendered.report.build_id.clone(),
            summary: rendered.report.summary,
            counts: rendered.report.counts,
            last_update: rendered.last_update,
        })
        .into_response(),
        Err(err) => (StatusCode::BAD_GATEWAY, err.to_string()).into_response(),
    }
}
