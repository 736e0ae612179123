//! Prometheus exporter for the FreeSWITCH event socket.
//!
//! On every pull of the telemetry endpoint the exporter opens one
//! event-socket session, authenticates, fetches a fixed set of values over
//! the command channel plus one `api status` round, and republishes them as
//! `freeswitch_*` metrics together with its own scrape counters. Every pull
//! is a fresh, complete round trip; there is no connection reuse and no
//! caching between scrapes.

pub mod catalog;
pub mod cli;
pub mod collector;
pub mod error;
pub mod http;
pub mod status;
