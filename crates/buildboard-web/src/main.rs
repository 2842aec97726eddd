use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use buildboard_core::{DashboardConfig, StatusTable};
use buildboard_web::api::ApiServer;
use buildboard_web::source::HttpSnapshotSource;

#[derive(Parser, Debug)]
#[command(name = "buildboard-web", about = "Serve the buildboard dashboard API")]
struct Args {
    /// Upstream base URL serving build snapshot JSON
    #[arg(long, default_value = "http://127.0.0.1:9090")]
    upstream: String,
    /// Address to bind (e.g., 127.0.0.1:8080)
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,
    /// Build ids to keep refreshed on the poll interval (repeatable)
    #[arg(long = "build")]
    builds: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = DashboardConfig::default();
    let source = Arc::new(HttpSnapshotSource::new(
        &args.upstream,
        Duration::from_secs(config.fetch_timeout_secs),
    )?);
    let server = ApiServer::new(source, StatusTable::default(), config.broadcast_capacity);

    if !args.builds.is_empty() {
        let poller = server.clone();
        let builds = args.builds.clone();
        let interval = Duration::from_secs_f64(config.poll_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                for build_id in &builds {
                    if let Err(err) = poller.refresh_build(build_id).await {
                        tracing::warn!(build_id = %build_id, error = %err, "refresh failed");
                    }
                }
            }
        });
    }

    let addr: SocketAddr = args.addr.parse().expect("invalid address");
    server.serve(addr).await;
    println!("Serving on http://{}", addr);
    futures::future::pending::<()>().await;
    Ok(())
}
