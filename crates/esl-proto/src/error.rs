//! Error types for the event-socket client.

use thiserror::Error;

/// Convenience type alias for Results using [`EslError`].
pub type Result<T, E = EslError> = std::result::Result<T, E>;

/// Failures while talking to the event socket.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EslError {
    /// I/O failure on the control connection.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The server rejected the handshake. Carries the server's reply text
    /// verbatim, or a short description when the exchange itself was off.
    #[error("auth failed: {0}")]
    Auth(String),

    /// A header line without a `name: value` shape.
    #[error("malformed header line {0:?}")]
    MalformedHeader(String),

    /// The peer closed the connection inside a header block.
    #[error("connection closed mid header block")]
    UnexpectedEof,

    /// A command reply without a `Content-Length` field.
    #[error("reply is missing Content-Length")]
    MissingContentLength,

    /// A `Content-Length` field that is not a byte count.
    #[error("invalid Content-Length {value:?}")]
    InvalidContentLength {
        /// The raw field value.
        value: String,
        /// The underlying parse error.
        #[source]
        cause: std::num::ParseIntError,
    },
}

/// Errors encountered when parsing a scrape endpoint URI.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EndpointParseError {
    /// The URI itself did not parse.
    #[error("cannot parse URI: {0}")]
    Uri(#[from] url::ParseError),

    /// A scheme other than `tcp` or `unix`.
    #[error("unsupported scheme {0:?} (expected \"tcp\" or \"unix\")")]
    UnsupportedScheme(String),

    /// A `tcp` URI without a host.
    #[error("missing host in tcp endpoint")]
    MissingHost,

    /// A `tcp` URI without a port.
    #[error("missing port in tcp endpoint")]
    MissingPort,

    /// A `unix` URI without a socket path.
    #[error("missing socket path in unix endpoint")]
    MissingPath,
}
