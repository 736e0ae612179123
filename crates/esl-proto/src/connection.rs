//! Event-socket session: dial, authenticate, execute api commands.
//!
//! One [`Connection`] is one socket. There is no reconnect or retry logic
//! here; a failed exchange leaves the connection in an unknown state and the
//! caller is expected to drop it. Dropping closes the socket.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadBuf};
use tokio::net::{TcpStream, UnixStream};
use tracing::trace;

use crate::endpoint::Endpoint;
use crate::error::EslError;
use crate::headers::HeaderBlock;

/// The socket flavors an endpoint can resolve to.
enum EslStream {
    Tcp(TcpStream),
    Unix(UnixStream),
}

impl AsyncRead for EslStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            EslStream::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
            EslStream::Unix(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for EslStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            EslStream::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
            EslStream::Unix(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            EslStream::Tcp(stream) => Pin::new(stream).poll_flush(cx),
            EslStream::Unix(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            EslStream::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
            EslStream::Unix(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

/// One open event-socket session with buffered input.
pub struct Connection {
    input: BufReader<EslStream>,
}

impl Connection {
    /// Dial the endpoint. Deadlines are the caller's concern: wrap the whole
    /// session, open included, in a timeout.
    pub async fn open(endpoint: &Endpoint) -> Result<Self, EslError> {
        let stream = match endpoint {
            Endpoint::Tcp(addr) => EslStream::Tcp(TcpStream::connect(addr).await?),
            Endpoint::Unix(path) => EslStream::Unix(UnixStream::connect(path).await?),
        };
        trace!(%endpoint, "connected");
        Ok(Self {
            input: BufReader::new(stream),
        })
    }

    /// Run the one-shot auth handshake. Must be the first exchange on a fresh
    /// connection; the server opens with an `auth/request` challenge and no
    /// command is accepted until it has been answered.
    pub async fn authenticate(&mut self, password: &str) -> Result<(), EslError> {
        let challenge = HeaderBlock::read_from(&mut self.input).await?;
        if challenge.content_type() != Some("auth/request") {
            return Err(EslError::Auth("unknown content-type".to_string()));
        }

        self.input
            .get_mut()
            .write_all(format!("auth {password}\n\n").as_bytes())
            .await?;

        let reply = HeaderBlock::read_from(&mut self.input).await?;
        if reply.content_type() != Some("command/reply") {
            return Err(EslError::Auth("unknown reply".to_string()));
        }
        match reply.get("Reply-Text") {
            Some("+OK accepted") => {
                trace!("authenticated");
                Ok(())
            }
            Some(other) => Err(EslError::Auth(other.to_string())),
            None => Err(EslError::Auth("unknown reply".to_string())),
        }
    }

    /// Issue one command and return the raw reply body.
    ///
    /// The command is terminated with a blank line, the reply envelope is a
    /// header block, and the body spans exactly `Content-Length` bytes. No
    /// interpretation of the body happens here.
    pub async fn execute(&mut self, command: &str) -> Result<Vec<u8>, EslError> {
        self.input
            .get_mut()
            .write_all(format!("{command}\n\n").as_bytes())
            .await?;

        let envelope = HeaderBlock::read_from(&mut self.input).await?;
        let length = envelope.content_length()?;

        let mut body = vec![0u8; length];
        self.input.read_exact(&mut body).await?;
        trace!(command, bytes = length, "command reply read");
        Ok(body)
    }
}
