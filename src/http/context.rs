//! Per-request context handed to the application.
//!
//! The context is built once per request cycle from the parsed request line,
//! the raw request bytes and the listener identity, and is never modified by
//! the gateway afterwards.

use std::collections::HashMap;
use std::io::Write;

use bytes::{Buf, Bytes};

use crate::http::request::ParsedRequest;
use crate::server::listener::ServerIdentity;

/// Context variable names.
pub mod keys {
    pub const VERSION: &str = "protocol.version";
    pub const URL_SCHEME: &str = "protocol.url_scheme";
    pub const INPUT: &str = "protocol.input";
    pub const ERRORS: &str = "protocol.errors";
    pub const MULTITHREAD: &str = "protocol.multithread";
    pub const MULTIPROCESS: &str = "protocol.multiprocess";
    pub const RUN_ONCE: &str = "protocol.run_once";
    pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
    pub const PATH_INFO: &str = "PATH_INFO";
    pub const SERVER_NAME: &str = "SERVER_NAME";
    pub const SERVER_PORT: &str = "SERVER_PORT";

    /// Every key present in a freshly built context.
    pub const REQUIRED: [&str; 11] = [
        VERSION,
        URL_SCHEME,
        INPUT,
        ERRORS,
        MULTITHREAD,
        MULTIPROCESS,
        RUN_ONCE,
        REQUEST_METHOD,
        PATH_INFO,
        SERVER_NAME,
        SERVER_PORT,
    ];
}

/// Protocol version advertised in `protocol.version`.
pub const PROTOCOL_VERSION: (u32, u32) = (1, 0);

/// A single context variable.
#[derive(Debug, Clone)]
pub enum ContextValue {
    Str(String),
    Bool(bool),
    Version(u32, u32),
    Input(RequestInput),
    Errors(ErrorStream),
}

impl std::fmt::Display for ContextValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextValue::Str(s) => write!(f, "{}", s),
            ContextValue::Bool(b) => write!(f, "{}", b),
            ContextValue::Version(major, minor) => write!(f, "({}, {})", major, minor),
            ContextValue::Input(input) => write!(f, "<input {} bytes>", input.len()),
            ContextValue::Errors(_) => write!(f, "<errors>"),
        }
    }
}

/// Readable view over the raw request bytes.
///
/// Every call to [`RequestInput::reader`] starts from the beginning.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    raw: Bytes,
}

impl RequestInput {
    pub fn new(raw: Bytes) -> Self {
        Self { raw }
    }

    pub fn reader(&self) -> bytes::buf::Reader<Bytes> {
        self.raw.clone().reader()
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Writable diagnostic stream; each write becomes an error event.
#[derive(Debug, Clone, Default)]
pub struct ErrorStream;

impl Write for ErrorStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let text = text.trim_end();
        if !text.is_empty() {
            tracing::error!(target: "portico::app", "{}", text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// The mapping of context variables for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    vars: HashMap<String, ContextValue>,
}

impl RequestContext {
    pub fn build(request: &ParsedRequest, raw: Bytes, server: &ServerIdentity) -> Self {
        let mut vars = HashMap::with_capacity(keys::REQUIRED.len());

        let (major, minor) = PROTOCOL_VERSION;
        vars.insert(keys::VERSION.to_string(), ContextValue::Version(major, minor));
        vars.insert(keys::URL_SCHEME.to_string(), ContextValue::Str("http".to_string()));
        vars.insert(keys::INPUT.to_string(), ContextValue::Input(RequestInput::new(raw)));
        vars.insert(keys::ERRORS.to_string(), ContextValue::Errors(ErrorStream));
        vars.insert(keys::MULTITHREAD.to_string(), ContextValue::Bool(false));
        vars.insert(keys::MULTIPROCESS.to_string(), ContextValue::Bool(false));
        vars.insert(keys::RUN_ONCE.to_string(), ContextValue::Bool(false));

        vars.insert(
            keys::REQUEST_METHOD.to_string(),
            ContextValue::Str(request.method.clone()),
        );
        vars.insert(keys::PATH_INFO.to_string(), ContextValue::Str(request.path.clone()));
        vars.insert(keys::SERVER_NAME.to_string(), ContextValue::Str(server.name.clone()));
        vars.insert(
            keys::SERVER_PORT.to_string(),
            ContextValue::Str(server.port.to_string()),
        );

        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.vars.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.vars.get(key) {
            Some(ContextValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.vars.get(key) {
            Some(ContextValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn request_method(&self) -> &str {
        self.get_str(keys::REQUEST_METHOD).unwrap_or_default()
    }

    pub fn path_info(&self) -> &str {
        self.get_str(keys::PATH_INFO).unwrap_or_default()
    }

    pub fn server_name(&self) -> &str {
        self.get_str(keys::SERVER_NAME).unwrap_or_default()
    }

    pub fn server_port(&self) -> &str {
        self.get_str(keys::SERVER_PORT).unwrap_or_default()
    }

    pub fn input(&self) -> Option<&RequestInput> {
        match self.vars.get(keys::INPUT) {
            Some(ContextValue::Input(input)) => Some(input),
            _ => None,
        }
    }

    pub fn errors(&self) -> ErrorStream {
        ErrorStream
    }
}
