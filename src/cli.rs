//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

/// Prometheus exporter for the FreeSWITCH event socket.
#[derive(Debug, Parser)]
#[command(name = "freeswitch_exporter", version, about)]
pub struct Cli {
    /// Address to listen on for web interface and telemetry.
    #[arg(
        short = 'l',
        long = "web.listen-address",
        env = "FREESWITCH_EXPORTER_WEB_LISTEN_ADDRESS",
        default_value = "0.0.0.0:9282"
    )]
    pub listen_address: SocketAddr,

    /// Path under which to expose metrics.
    #[arg(
        long = "web.telemetry-path",
        env = "FREESWITCH_EXPORTER_WEB_TELEMETRY_PATH",
        default_value = "/metrics"
    )]
    pub telemetry_path: String,

    /// URI on which to scrape FreeSWITCH, e.g. "tcp://localhost:8021" or
    /// "unix:///var/run/freeswitch/event_socket".
    #[arg(
        short = 'u',
        long = "freeswitch.scrape-uri",
        env = "FREESWITCH_EXPORTER_SCRAPE_URI",
        default_value = "tcp://localhost:8021"
    )]
    pub scrape_uri: String,

    /// Timeout for one complete scrape, connect through close.
    #[arg(
        short = 't',
        long = "freeswitch.timeout",
        env = "FREESWITCH_EXPORTER_TIMEOUT",
        default_value = "5s",
        value_parser = humantime::parse_duration
    )]
    pub timeout: Duration,

    /// Password for the FreeSWITCH event socket.
    #[arg(
        short = 'P',
        long = "freeswitch.password",
        env = "FREESWITCH_EXPORTER_PASSWORD",
        default_value = "ClueCon"
    )]
    pub password: String,
}
