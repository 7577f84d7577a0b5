/// The request line of an HTTP request.
///
/// Only the first line is ever parsed; headers and body stay in the raw
/// request bytes exposed through `protocol.input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// The HTTP method, verbatim (e.g. "GET")
    pub method: String,
    /// The request target (e.g. "/hello")
    pub path: String,
    /// HTTP version (e.g. "HTTP/1.1")
    pub version: String,
}

impl ParsedRequest {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            version: version.into(),
        }
    }
}
