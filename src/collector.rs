//! Scrape orchestration: one gated event-socket session per metrics pull.
//!
//! Concurrent pulls are serialized by a mutex held from connect through
//! close, so at most one session exists at a time and no socket operations
//! interleave. Each pull renders a fresh snapshot: metric values never
//! survive from one scrape to the next, and a failed scrape publishes
//! nothing except the up gauge and the two scrape counters.

use std::time::Duration;

use chrono::Utc;
use esl_proto::{Connection, Endpoint};
use prometheus::{Counter, Encoder, Gauge, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use serde::Deserialize;
use tokio::time::{timeout_at, Instant};
use tracing::{error, warn};

use crate::catalog::{Catalog, MetricDef, MetricKind, NAMESPACE, STATUS_COMMAND};
use crate::error::{DecodeError, ScrapeError};

/// One decoded observation, paired with its definition.
type Sample = (&'static MetricDef, f64);

/// The scrape orchestrator.
///
/// Owns the endpoint configuration, the catalog, the serialization gate and
/// the process-lifetime scrape counters. Connections are purely local to one
/// scrape call; nothing network-related is shared across scrapes.
pub struct Collector {
    endpoint: Endpoint,
    password: String,
    timeout: Duration,
    catalog: Catalog,
    gate: tokio::sync::Mutex<()>,

    up: IntGauge,
    total_scrapes: IntCounter,
    failed_scrapes: IntCounter,
}

impl Collector {
    pub fn new(endpoint: Endpoint, password: String, timeout: Duration, catalog: Catalog) -> Self {
        let up = IntGauge::with_opts(
            Opts::new("up", "Was the last scrape successful.").namespace(NAMESPACE),
        )
        .expect("up gauge creation failed");
        let total_scrapes = IntCounter::with_opts(
            Opts::new("exporter_total_scrapes", "Current total freeswitch scrapes.")
                .namespace(NAMESPACE),
        )
        .expect("total_scrapes counter creation failed");
        let failed_scrapes = IntCounter::with_opts(
            Opts::new("exporter_failed_scrapes", "Number of failed freeswitch scrapes.")
                .namespace(NAMESPACE),
        )
        .expect("failed_scrapes counter creation failed");

        Self {
            endpoint,
            password,
            timeout,
            catalog,
            gate: tokio::sync::Mutex::new(()),
            up,
            total_scrapes,
            failed_scrapes,
        }
    }

    /// Run one gated scrape and render the snapshot in the Prometheus text
    /// exposition format.
    ///
    /// A scrape that fails anywhere still renders successfully: the output
    /// then carries only the up gauge (0) and the scrape counters. The only
    /// errors surfaced here are registry/encoding ones, which mean a bug
    /// rather than a switch problem.
    pub async fn scrape(&self) -> Result<String, prometheus::Error> {
        let _session = self.gate.lock().await;
        self.total_scrapes.inc();

        let registry = Registry::new();
        registry.register(Box::new(self.up.clone()))?;
        registry.register(Box::new(self.total_scrapes.clone()))?;
        registry.register(Box::new(self.failed_scrapes.clone()))?;

        match self.run_session().await {
            Ok(samples) => {
                for (def, value) in samples {
                    register_sample(&registry, def, value)?;
                }
                self.up.set(1);
            }
            Err(err) => {
                self.failed_scrapes.inc();
                self.up.set(0);
                error!(stage = err.stage(), error = %err, "scrape failed");
            }
        }

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        match String::from_utf8(buffer) {
            Ok(body) => Ok(body),
            Err(e) => {
                error!(error = %e, "encoded metrics were not valid UTF-8");
                Ok(String::new())
            }
        }
    }

    /// One complete session under the scrape-wide deadline. The deadline is
    /// absolute: it covers dial, handshake, every command and the status
    /// round, not just the initial connect.
    async fn run_session(&self) -> Result<Vec<Sample>, ScrapeError> {
        let deadline = Instant::now() + self.timeout;
        match timeout_at(deadline, self.session()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ScrapeError::Deadline(self.timeout)),
        }
    }

    /// Connect, authenticate, fetch every catalog metric. The connection is
    /// dropped (closed) on every exit path, the deadline-expiry one
    /// included, because it never escapes this scope.
    async fn session(&self) -> Result<Vec<Sample>, ScrapeError> {
        let mut conn =
            Connection::open(&self.endpoint)
                .await
                .map_err(|source| ScrapeError::Connect {
                    endpoint: self.endpoint.to_string(),
                    source,
                })?;

        conn.authenticate(&self.password)
            .await
            .map_err(ScrapeError::Auth)?;

        let mut samples = Vec::with_capacity(self.catalog.len());

        for (def, command) in self.catalog.command_metrics() {
            let issued_at = Utc::now().timestamp();
            let body = conn
                .execute(command)
                .await
                .map_err(|source| ScrapeError::Command { command, source })?;
            samples.push((def, decode_command_value(def.name, &body, issued_at)?));
        }

        let body = conn
            .execute(STATUS_COMMAND)
            .await
            .map_err(|source| ScrapeError::Command {
                command: STATUS_COMMAND,
                source,
            })?;
        let text = String::from_utf8_lossy(&body);
        let groups = self.catalog.status().parse(&text)?;

        for (def, group) in self.catalog.status_metrics() {
            let value = groups[group - 1]
                .parse()
                .map_err(|cause: std::num::ParseFloatError| ScrapeError::Decode {
                    metric: def.name,
                    source: cause.into(),
                })?;
            samples.push((def, value));
        }

        Ok(samples)
    }
}

/// Shape of the `api show calls count as json` reply. A reply without the
/// field counts as zero calls.
#[derive(Debug, Deserialize)]
struct CallsCountReply {
    #[serde(default)]
    row_count: f64,
}

/// Decode one command reply body into its metric value.
///
/// Decoding is metric-specific; the catalog names which command feeds which
/// metric, this table knows what the body looks like.
fn decode_command_value(
    metric: &'static str,
    body: &[u8],
    issued_at: i64,
) -> Result<f64, ScrapeError> {
    let decode = |source: DecodeError| ScrapeError::Decode { metric, source };

    match metric {
        "current_calls" => {
            let reply: CallsCountReply =
                serde_json::from_slice(body).map_err(|e| decode(e.into()))?;
            Ok(reply.row_count)
        }
        "uptime_seconds" => {
            let raw = std::str::from_utf8(body).map_err(|e| decode(e.into()))?;
            // At most one trailing newline is stripped; the backend emits
            // exactly one and anything beyond that is a malformed reply.
            let raw = raw.strip_suffix('\n').unwrap_or(raw);
            raw.parse().map_err(|e: std::num::ParseFloatError| decode(e.into()))
        }
        "time_synced" => {
            let raw = std::str::from_utf8(body).map_err(|e| decode(e.into()))?;
            let switch_epoch: i64 = raw
                .parse()
                .map_err(|e: std::num::ParseIntError| decode(e.into()))?;
            if switch_epoch == issued_at {
                Ok(1.0)
            } else {
                warn!(
                    system = issued_at,
                    freeswitch = switch_epoch,
                    "time not in sync between system and FreeSWITCH"
                );
                Ok(0.0)
            }
        }
        other => Err(ScrapeError::UnknownMetric(other)),
    }
}

/// Register one freshly-built instrument carrying a decoded value.
fn register_sample(
    registry: &Registry,
    def: &MetricDef,
    value: f64,
) -> Result<(), prometheus::Error> {
    let opts = Opts::new(def.name, def.help).namespace(NAMESPACE);
    match def.kind {
        MetricKind::Gauge => {
            let gauge = Gauge::with_opts(opts)?;
            gauge.set(value);
            registry.register(Box::new(gauge))?;
        }
        MetricKind::Counter => {
            let counter = Counter::with_opts(opts)?;
            counter.inc_by(value);
            registry.register(Box::new(counter))?;
        }
    }
    Ok(())
}
