//! Two-phase response protocol.
//!
//! The application first declares status and headers through
//! [`StartResponse::begin_response`], then returns its body. The gateway
//! buffers the whole response and sends it with a single write.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::GatewayError;
use crate::http::body::{Body, Chunk};
use crate::http::connection::Connection;
use crate::http::writer::serialize_head;

/// Common HTTP status codes, rendered as `"<code> <reason>"` status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use portico::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// Where the response is in the two-phase protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseState {
    AwaitingHeaders,
    HeadersSet {
        status: String,
        headers: Vec<(String, String)>,
    },
}

/// The `begin_response` side of the protocol, one per request cycle.
#[derive(Debug)]
pub struct StartResponse {
    state: ResponseState,
    server_headers: Vec<(String, String)>,
    /// Output of [`BodyWriter`], sent ahead of the returned body.
    written: BytesMut,
}

/// Write capability returned by `begin_response`.
///
/// Bytes written here go out right after the header block.
pub struct BodyWriter<'a> {
    buf: &'a mut BytesMut,
}

impl BodyWriter<'_> {
    pub fn write_chunk(&mut self, chunk: impl Into<Chunk>) {
        self.buf.extend_from_slice(chunk.into().as_bytes());
    }
}

impl std::io::Write for BodyWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StartResponse {
    /// `server_headers` are appended after the application's headers.
    pub fn new(server_headers: Vec<(String, String)>) -> Self {
        Self {
            state: ResponseState::AwaitingHeaders,
            server_headers,
            written: BytesMut::new(),
        }
    }

    pub fn state(&self) -> &ResponseState {
        &self.state
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, ResponseState::HeadersSet { .. })
    }

    /// Records status and headers. Fails with `DoubleResponse` if called again.
    pub fn begin_response<I, K, V>(
        &mut self,
        status: impl Into<String>,
        headers: I,
    ) -> Result<BodyWriter<'_>, GatewayError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if self.is_started() {
            return Err(GatewayError::DoubleResponse);
        }
        Ok(self.set_headers(status.into(), headers))
    }

    /// Records status and headers after the application hit a fault.
    ///
    /// Replaces anything declared earlier. Nothing has reached the client at
    /// this point, so output buffered through an earlier writer is discarded.
    pub fn begin_response_with_fault<I, K, V>(
        &mut self,
        status: impl Into<String>,
        headers: I,
        fault: &anyhow::Error,
    ) -> BodyWriter<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let status = status.into();
        tracing::warn!(status = %status, fault = %fault, "Application replaced response after fault");
        self.written.clear();
        self.set_headers(status, headers)
    }

    fn set_headers<I, K, V>(&mut self, status: String, headers: I) -> BodyWriter<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut all: Vec<(String, String)> = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        all.extend(self.server_headers.iter().cloned());

        self.state = ResponseState::HeadersSet {
            status,
            headers: all,
        };

        BodyWriter {
            buf: &mut self.written,
        }
    }

    /// Serializes the head, writer output and every body chunk into one buffer.
    ///
    /// Fails with `ResponseNotStarted` before draining anything if
    /// `begin_response` was never called.
    pub fn render(self, body: Body) -> Result<Bytes, GatewayError> {
        let ResponseState::HeadersSet { status, headers } = self.state else {
            return Err(GatewayError::ResponseNotStarted);
        };

        let mut buf = serialize_head(&status, &headers);
        buf.extend_from_slice(&self.written);

        for chunk in body {
            let chunk = chunk.map_err(GatewayError::from_application)?;
            buf.extend_from_slice(chunk.as_bytes());
        }

        Ok(buf.freeze())
    }

    /// Renders the response, sends it in one write and closes the connection.
    ///
    /// The connection is closed on every path, including when rendering
    /// fails; in that case nothing is written.
    pub async fn finish<S>(self, conn: &mut Connection<S>, body: Body) -> Result<usize, GatewayError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let result = match self.render(body) {
            Ok(response) => {
                echo_response(&response);
                conn.send(&response)
                    .await
                    .map(|_| response.len())
                    .map_err(GatewayError::from)
            }
            Err(e) => Err(e),
        };

        conn.close().await;
        result
    }
}

fn echo_response(response: &[u8]) {
    for line in String::from_utf8_lossy(response).lines() {
        tracing::debug!("> {}", line);
    }
}
