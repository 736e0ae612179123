//! HTTP server for the telemetry endpoint.
//!
//! Every GET of the telemetry path triggers one registry pull, which runs at
//! most one gated scrape. There is no background collection; the exporter is
//! entirely pull-driven.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::collector::Collector;

/// Handler for the telemetry path: run one scrape, return the snapshot in
/// Prometheus text format.
async fn metrics_handler(State(collector): State<Arc<Collector>>) -> Result<String, StatusCode> {
    collector.scrape().await.map_err(|e| {
        tracing::error!(error = %e, "failed to render metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Serve the telemetry endpoint until the process is terminated.
pub async fn run_http_server(
    addr: SocketAddr,
    telemetry_path: &str,
    collector: Arc<Collector>,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        telemetry_path.starts_with('/'),
        "telemetry path must start with '/', got {telemetry_path:?}"
    );

    let app = Router::new()
        .route(telemetry_path, get(metrics_handler))
        .with_state(collector);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, path = telemetry_path, "exporter listening");

    axum::serve(listener, app).await?;
    Ok(())
}
