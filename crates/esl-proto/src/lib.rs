//! Client library for the FreeSWITCH event-socket protocol.
//!
//! The event socket is a line-oriented control protocol: every exchange is
//! framed by a MIME-style header block (`Field: value` lines terminated by a
//! blank line), and command reply bodies are delimited by an exact byte count
//! carried in the `Content-Length` header field.
//!
//! A session is one [`Connection`]: dial a [`Endpoint`], run the one-shot
//! auth handshake, then issue `api` commands and collect their raw bodies.
//! Dropping the connection closes the socket.
//!
//! ```ignore
//! use esl_proto::{Connection, Endpoint};
//!
//! let endpoint: Endpoint = "tcp://localhost:8021".parse()?;
//! let mut conn = Connection::open(&endpoint).await?;
//! conn.authenticate("ClueCon").await?;
//! let body = conn.execute("api uptime s").await?;
//! ```

pub mod connection;
pub mod endpoint;
pub mod error;
pub mod headers;

pub use connection::Connection;
pub use endpoint::Endpoint;
pub use error::{EndpointParseError, EslError, Result};
pub use headers::HeaderBlock;
