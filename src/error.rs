//! Scrape failure classification.
//!
//! Any error anywhere in a scrape aborts it; nothing is retried. Each
//! failure is tagged with the stage that produced it and keeps the
//! underlying cause, so the log line and the classification come from the
//! same value.

use std::time::Duration;

use esl_proto::EslError;
use thiserror::Error;

/// One scrape-aborting failure.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Dialing the endpoint failed.
    #[error("connect to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: EslError,
    },

    /// The scrape-wide deadline expired.
    #[error("scrape deadline of {0:?} exceeded")]
    Deadline(Duration),

    /// The auth handshake failed.
    #[error("authentication: {0}")]
    Auth(#[source] EslError),

    /// A command exchange failed at the framing or transport level.
    #[error("command {command:?}: {source}")]
    Command {
        command: &'static str,
        #[source]
        source: EslError,
    },

    /// A reply body could not be turned into a sample value.
    #[error("cannot decode {metric}: {source}")]
    Decode {
        metric: &'static str,
        #[source]
        source: DecodeError,
    },

    /// The status text did not match the session pattern exactly once.
    #[error("status output matched the session pattern {matches} times, want exactly 1")]
    StatusPattern { matches: usize },

    /// A catalog entry without a decoder. Means the catalog and the decoder
    /// table have drifted apart.
    #[error("no decoder for metric {0}")]
    UnknownMetric(&'static str),
}

impl ScrapeError {
    /// Static stage label for structured logs.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Deadline(_) => "deadline",
            Self::Auth(_) => "auth",
            Self::Command { .. } => "command",
            Self::Decode { .. } | Self::UnknownMetric(_) => "decode",
            Self::StatusPattern { .. } => "status",
        }
    }
}

/// Why a response body could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("not a number: {0}")]
    Float(#[from] std::num::ParseFloatError),

    #[error("not an integer: {0}")]
    Int(#[from] std::num::ParseIntError),
}
