//! Gateway error taxonomy.
//!
//! Transport errors (`Accept`) are recovered by the serve loop, request-level
//! errors end only the current request cycle, and `Bind` is fatal at startup.

use crate::http::parser::ParseError;

/// Errors surfaced by the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The listening socket could not be created, bound or put into listen mode.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accepting a client connection failed.
    #[error("failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),

    /// The request line could not be split into method, path and version.
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] ParseError),

    /// `begin_response` was called a second time without a fault.
    #[error("begin_response called twice without a fault")]
    DoubleResponse,

    /// The body was handed over before `begin_response` was called.
    #[error("response body produced before begin_response")]
    ResponseNotStarted,

    /// The application callback or its body iterator failed.
    #[error("application error: {0:#}")]
    Application(anyhow::Error),

    /// Reading from or writing to the client failed.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Wraps an application failure, unwrapping gateway errors the
    /// application propagated with `?` (e.g. a rejected second `begin_response`).
    pub fn from_application(err: anyhow::Error) -> Self {
        match err.downcast::<GatewayError>() {
            Ok(inner) => inner,
            Err(err) => GatewayError::Application(err),
        }
    }

    /// Whether the error was caused by the application breaking the response contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, GatewayError::DoubleResponse | GatewayError::ResponseNotStarted)
    }
}
