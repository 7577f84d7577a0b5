use std::net::SocketAddr;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// One accepted client stream, owned by a single request cycle.
///
/// Once closed, the stream is shut down and dropped; further sends fail.
pub struct Connection<S> {
    stream: Option<S>,
    peer: Option<SocketAddr>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: Option<SocketAddr>) -> Self {
        Self {
            stream: Some(stream),
            peer,
        }
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Reads the raw request.
    ///
    /// Stops at the end of the header block, at EOF, or once `limit` bytes
    /// have been read, whichever comes first.
    pub async fn read_request(&mut self, limit: usize) -> std::io::Result<Bytes> {
        let stream = self.stream.as_mut().ok_or_else(closed_error)?;
        let mut buffer = BytesMut::with_capacity(limit.min(4096));

        while buffer.len() < limit {
            let mut temp = [0u8; 1024];
            let want = (limit - buffer.len()).min(temp.len());
            let n = stream.read(&mut temp[..want]).await?;

            if n == 0 {
                // Client closed its write side
                break;
            }

            buffer.extend_from_slice(&temp[..n]);

            if find_headers_end(&buffer).is_some() {
                break;
            }
        }

        Ok(buffer.freeze())
    }

    /// Writes the whole buffer and flushes it.
    pub async fn send(&mut self, buf: &[u8]) -> std::io::Result<()> {
        let stream = self.stream.as_mut().ok_or_else(closed_error)?;
        stream.write_all(buf).await?;
        stream.flush().await
    }

    /// Shuts the stream down and releases it. Idempotent.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::debug!(peer = ?self.peer, error = %e, "Shutdown failed");
            }
        }
    }
}

fn closed_error() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotConnected, "connection already closed")
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
