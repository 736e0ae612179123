//! Scrape endpoint addressing.
//!
//! An endpoint is derived once from a configured URI and stays immutable for
//! the life of the process. Only stream sockets are supported: `tcp://` with
//! a host and port, or `unix://` with a filesystem path.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::error::EndpointParseError;

/// Where the event socket lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A `host:port` pair to dial over TCP.
    Tcp(String),
    /// A local socket path.
    Unix(PathBuf),
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(uri)?;
        match url.scheme() {
            "tcp" => {
                let host = url.host_str().ok_or(EndpointParseError::MissingHost)?;
                if host.is_empty() {
                    return Err(EndpointParseError::MissingHost);
                }
                let port = url.port().ok_or(EndpointParseError::MissingPort)?;
                Ok(Endpoint::Tcp(format!("{host}:{port}")))
            }
            "unix" => {
                let path = url.path();
                if path.is_empty() || path == "/" {
                    return Err(EndpointParseError::MissingPath);
                }
                Ok(Endpoint::Unix(PathBuf::from(path)))
            }
            other => Err(EndpointParseError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp(addr) => write!(f, "tcp://{addr}"),
            Endpoint::Unix(path) => write!(f, "unix://{}", path.display()),
        }
    }
}
