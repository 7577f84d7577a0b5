use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{error, info, warn};

use crate::app::Application;
use crate::config::ServerConfig;
use crate::error::GatewayError;
use crate::http::connection::Connection;
use crate::http::context::RequestContext;
use crate::http::parser::parse_request;
use crate::http::response::{StartResponse, StatusCode};
use crate::http::writer::{serialize_head, server_headers};
use crate::server::listener::{Listener, ServerIdentity};

/// Serves one request per connection, one connection at a time.
pub struct Gateway {
    listener: Listener,
    app: Arc<dyn Application>,
    max_request_bytes: usize,
    live_date: bool,
    reply_bad_request: bool,
}

impl Gateway {
    /// Binds the configured address and installs the application.
    pub async fn bind(cfg: &ServerConfig, app: Arc<dyn Application>) -> Result<Self, GatewayError> {
        let mut listener = Listener::bind(&cfg.listen_addr, cfg.backlog).await?;
        if let Some(name) = &cfg.server_name {
            listener = listener.with_server_name(name.clone());
        }
        Ok(Self::new(listener, app, cfg))
    }

    pub fn new(listener: Listener, app: Arc<dyn Application>, cfg: &ServerConfig) -> Self {
        Self {
            listener,
            app,
            max_request_bytes: cfg.max_request_bytes.max(1),
            live_date: cfg.live_date,
            reply_bad_request: cfg.reply_bad_request,
        }
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    pub fn identity(&self) -> &ServerIdentity {
        self.listener.local_name()
    }

    /// Accept, handle, close, forever. Accept errors are logged and skipped.
    pub async fn serve_forever(&self) {
        loop {
            // Request failures are logged by handle_one_request
            if let Err(e @ GatewayError::Accept(_)) = self.serve_one().await {
                error!("{}", e);
            }
        }
    }

    /// Accepts a single connection and runs one request cycle on it.
    pub async fn serve_one(&self) -> Result<(), GatewayError> {
        let conn = self.listener.accept().await?;
        self.handle_one_request(conn).await
    }

    /// Runs one request cycle. The connection is closed when this returns,
    /// whatever the outcome.
    pub async fn handle_one_request<S>(&self, mut conn: Connection<S>) -> Result<(), GatewayError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let result = self.run_cycle(&mut conn).await;

        if let Err(GatewayError::MalformedRequest(_)) = &result {
            if self.reply_bad_request && !conn.is_closed() {
                self.reject(&mut conn).await;
            }
        }

        conn.close().await;

        match &result {
            Ok(()) => {}
            Err(e) if e.is_contract_violation() => {
                error!(peer = ?conn.peer(), error = %e, "Application broke the response contract")
            }
            Err(e) => warn!(peer = ?conn.peer(), error = %e, "Request failed"),
        }

        result
    }

    async fn run_cycle<S>(&self, conn: &mut Connection<S>) -> Result<(), GatewayError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let raw = conn.read_request(self.max_request_bytes).await?;
        for line in String::from_utf8_lossy(&raw).lines() {
            tracing::debug!("< {}", line);
        }

        let request = parse_request(&raw)?;
        info!(method = %request.method, path = %request.path, version = %request.version, "Request");

        let ctx = RequestContext::build(&request, raw, self.identity());
        let mut start = StartResponse::new(server_headers(self.live_date));

        let body = self
            .app
            .call(&ctx, &mut start)
            .map_err(GatewayError::from_application)?;

        let sent = start.finish(conn, body).await?;
        tracing::debug!(bytes = sent, "Response sent");
        Ok(())
    }

    async fn reject<S>(&self, conn: &mut Connection<S>)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let body = StatusCode::BadRequest.to_string();
        let mut headers = vec![
            ("Content-Type".to_string(), "text/plain".to_string()),
            ("Content-Length".to_string(), body.len().to_string()),
        ];
        headers.extend(server_headers(self.live_date));

        let mut response = serialize_head(&body, &headers);
        response.extend_from_slice(body.as_bytes());

        if let Err(e) = conn.send(&response).await {
            tracing::debug!(error = %e, "Could not send 400 response");
        }
    }
}
