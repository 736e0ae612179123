//! Binary entry point: parse flags, build the collector, serve telemetry.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use esl_proto::Endpoint;
use tracing::info;
use tracing_subscriber::EnvFilter;

use freeswitch_exporter::catalog::Catalog;
use freeswitch_exporter::cli::Cli;
use freeswitch_exporter::collector::Collector;
use freeswitch_exporter::http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    // A bad endpoint URI is fatal here, not a per-scrape failure.
    let endpoint: Endpoint = cli
        .scrape_uri
        .parse()
        .with_context(|| format!("cannot parse scrape URI {:?}", cli.scrape_uri))?;

    info!(
        endpoint = %endpoint,
        timeout = %humantime::format_duration(cli.timeout),
        "starting freeswitch_exporter"
    );

    let collector = Arc::new(Collector::new(
        endpoint,
        cli.password,
        cli.timeout,
        Catalog::standard(),
    ));

    http::run_http_server(cli.listen_address, &cli.telemetry_path, collector).await
}
