use portico::http::parser::{ParseError, parse_request};

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[test]
fn test_parse_keeps_tokens_verbatim() {
    let cases = [
        ("GET", "/hello", "HTTP/1.1"),
        ("POST", "/api/items", "HTTP/1.0"),
        ("BREW", "/pot?sugar=2", "HTCPCP/1.0"),
        ("get", "*", "HTTP/2"),
    ];

    for (method, path, version) in cases {
        let req = format!("{} {} {}\r\n\r\n", method, path, version);
        let parsed = parse_request(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, method);
        assert_eq!(parsed.path, path);
        assert_eq!(parsed.version, version);
    }
}

#[test]
fn test_parse_ignores_headers_and_body() {
    let req = b"POST /upload HTTP/1.1\r\nBrokenHeader\r\nContent-Length: 4\r\n\r\n\x00\x01";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.method, "POST");
    assert_eq!(parsed.path, "/upload");
}

#[test]
fn test_parse_bare_lf_line_ending() {
    let parsed = parse_request(b"GET /x HTTP/1.1\nHost: a\n\n").unwrap();
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[test]
fn test_parse_request_line_without_terminator() {
    let parsed = parse_request(b"HEAD /index.html HTTP/1.1").unwrap();
    assert_eq!(parsed.method, "HEAD");
}

#[test]
fn test_parse_extra_whitespace_between_tokens() {
    let parsed = parse_request(b"GET   /spaced \t HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.path, "/spaced");
}

#[test]
fn test_parse_single_token_is_malformed() {
    let result = parse_request(b"GET\r\n\r\n");
    assert_eq!(result, Err(ParseError::TokenCount(1)));
}

#[test]
fn test_parse_two_tokens_is_malformed() {
    let result = parse_request(b"GET /\r\n\r\n");
    assert_eq!(result, Err(ParseError::TokenCount(2)));
}

#[test]
fn test_parse_four_tokens_is_malformed() {
    let result = parse_request(b"GET / HTTP/1.1 extra\r\n\r\n");
    assert_eq!(result, Err(ParseError::TokenCount(4)));
}

#[test]
fn test_parse_empty_request() {
    assert_eq!(parse_request(b""), Err(ParseError::Empty));
}

#[test]
fn test_parse_invalid_utf8() {
    let result = parse_request(b"GET /\xff\xfe HTTP/1.1\r\n\r\n");
    assert_eq!(result, Err(ParseError::InvalidEncoding));
}
