use std::time::SystemTime;

use bytes::{BufMut, BytesMut};

pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Value of the `Server` header added to every response.
pub const SERVER_SOFTWARE: &str = concat!("Portico ", env!("CARGO_PKG_VERSION"));

/// `Date` value used unless live dates are enabled.
pub const FIXED_DATE: &str = "Tue, 31 Mar 2015 12:54:48 GMT";

/// Headers the gateway appends after the application's own headers.
pub fn server_headers(live_date: bool) -> Vec<(String, String)> {
    let date = if live_date {
        httpdate::fmt_http_date(SystemTime::now())
    } else {
        FIXED_DATE.to_string()
    };

    vec![
        ("Date".to_string(), date),
        ("Server".to_string(), SERVER_SOFTWARE.to_string()),
    ]
}

/// Serializes the status line, the headers in order and the blank line.
pub fn serialize_head(status: &str, headers: &[(String, String)]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(256);

    // Status line
    buf.put_slice(HTTP_VERSION.as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(status.as_bytes());
    buf.put_slice(b"\r\n");

    // Headers
    for (k, v) in headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf
}
