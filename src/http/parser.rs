use crate::http::request::ParsedRequest;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("request contains no request line")]
    Empty,
    #[error("request is not valid UTF-8")]
    InvalidEncoding,
    #[error("request line has {0} tokens, expected 3")]
    TokenCount(usize),
}

/// Parses the request line out of the raw request bytes.
///
/// Everything after the first line is ignored here.
pub fn parse_request(buf: &[u8]) -> Result<ParsedRequest, ParseError> {
    let text = std::str::from_utf8(buf).map_err(|_| ParseError::InvalidEncoding)?;

    let request_line = text
        .lines()
        .next()
        .ok_or(ParseError::Empty)?
        .trim_end_matches(['\r', '\n']);

    let parts: Vec<&str> = request_line.split_whitespace().collect();

    match parts.as_slice() {
        [method, path, version] => Ok(ParsedRequest::new(*method, *path, *version)),
        [] if text.trim().is_empty() => Err(ParseError::Empty),
        other => Err(ParseError::TokenCount(other.len())),
    }
}
