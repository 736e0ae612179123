//! The fixed set of metrics published per scrape.
//!
//! Each definition names either an api command to issue or a capture group
//! of the status pattern. The catalog is built once at startup and handed to
//! the orchestrator by reference; it never changes afterwards.

use crate::status::StatusParser;

/// Metric name prefix.
pub const NAMESPACE: &str = "freeswitch";

/// The command whose free-text response feeds the status-group metrics.
pub const STATUS_COMMAND: &str = "api status";

/// How a metric value behaves over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// Where a metric value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// The decoded body of one api command.
    Command(&'static str),
    /// One capture group (1-based) of the status pattern.
    StatusGroup(usize),
}

/// One metric the exporter publishes.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub source: ValueSource,
}

use MetricKind::{Counter, Gauge};
use ValueSource::{Command, StatusGroup};

const METRICS: &[MetricDef] = &[
    MetricDef {
        name: "current_calls",
        help: "Number of calls active",
        kind: Gauge,
        source: Command("api show calls count as json"),
    },
    MetricDef {
        name: "uptime_seconds",
        help: "Uptime in seconds",
        kind: Gauge,
        source: Command("api uptime s"),
    },
    MetricDef {
        name: "time_synced",
        help: "Is FreeSWITCH time in sync with exporter host time",
        kind: Gauge,
        source: Command("api strepoch"),
    },
    MetricDef {
        name: "sessions_total",
        help: "Number of sessions since startup",
        kind: Counter,
        source: StatusGroup(1),
    },
    MetricDef {
        name: "current_sessions",
        help: "Number of sessions active",
        kind: Gauge,
        source: StatusGroup(2),
    },
    MetricDef {
        name: "current_sessions_peak",
        help: "Peak sessions since startup",
        kind: Gauge,
        source: StatusGroup(3),
    },
    MetricDef {
        name: "current_sessions_peak_last_5min",
        help: "Peak sessions for the last 5 minutes",
        kind: Gauge,
        source: StatusGroup(4),
    },
    MetricDef {
        name: "current_sps",
        help: "Number of sessions per second",
        kind: Gauge,
        source: StatusGroup(5),
    },
    MetricDef {
        name: "current_sps_peak",
        help: "Peak sessions per second since startup",
        kind: Gauge,
        source: StatusGroup(7),
    },
    MetricDef {
        name: "current_sps_peak_last_5min",
        help: "Peak sessions per second for the last 5 minutes",
        kind: Gauge,
        source: StatusGroup(8),
    },
    MetricDef {
        name: "max_sps",
        help: "Max sessions per second allowed",
        kind: Gauge,
        source: StatusGroup(6),
    },
    MetricDef {
        name: "max_sessions",
        help: "Max sessions allowed",
        kind: Gauge,
        source: StatusGroup(9),
    },
    MetricDef {
        name: "current_idle_cpu",
        help: "CPU idle",
        kind: Gauge,
        source: StatusGroup(11),
    },
    MetricDef {
        name: "min_idle_cpu",
        help: "Minimum CPU idle",
        kind: Gauge,
        source: StatusGroup(10),
    },
];

/// The immutable catalog plus the compiled status pattern.
pub struct Catalog {
    metrics: &'static [MetricDef],
    status: StatusParser,
}

impl Catalog {
    /// The standard catalog every exporter instance publishes.
    pub fn standard() -> Self {
        Self {
            metrics: METRICS,
            status: StatusParser::new(),
        }
    }

    /// Number of metric definitions.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether the catalog is empty. It never is, but clippy insists the
    /// pair exists.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Command-driven definitions, in catalog order.
    pub fn command_metrics(&self) -> impl Iterator<Item = (&'static MetricDef, &'static str)> {
        self.metrics.iter().filter_map(|def| match def.source {
            Command(command) => Some((def, command)),
            StatusGroup(_) => None,
        })
    }

    /// Status-group definitions, in catalog order, with their 1-based group.
    pub fn status_metrics(&self) -> impl Iterator<Item = (&'static MetricDef, usize)> {
        self.metrics.iter().filter_map(|def| match def.source {
            StatusGroup(group) => Some((def, group)),
            Command(_) => None,
        })
    }

    /// The status pattern shared by all status-group metrics.
    pub fn status(&self) -> &StatusParser {
        &self.status
    }
}
