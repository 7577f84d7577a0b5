use portico::http::body::{Body, Chunk};
use portico::http::connection::Connection;
use portico::http::response::{ResponseState, StartResponse, StatusCode};
use portico::http::writer::{FIXED_DATE, SERVER_SOFTWARE, server_headers};
use portico::GatewayError;
use tokio::io::{AsyncReadExt, DuplexStream};

fn pair() -> (DuplexStream, Connection<DuplexStream>) {
    let (client, server) = tokio::io::duplex(64 * 1024);
    (client, Connection::new(server, None))
}

async fn read_all(client: &mut DuplexStream) -> Vec<u8> {
    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();
    received
}

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_begin_response_records_state() {
    let mut start = StartResponse::new(server_headers(false));
    assert_eq!(start.state(), &ResponseState::AwaitingHeaders);

    start.begin_response("200 OK", [("Content-Type", "text/plain")]).unwrap();

    match start.state() {
        ResponseState::HeadersSet { status, headers } => {
            assert_eq!(status, "200 OK");
            let names: Vec<&str> = headers.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(names, ["Content-Type", "Date", "Server"]);
        }
        other => panic!("unexpected state {:?}", other),
    }
}

#[test]
fn test_begin_response_twice_is_rejected() {
    let mut start = StartResponse::new(server_headers(false));
    start.begin_response("200 OK", [("A", "1")]).unwrap();

    let second = start.begin_response("404 Not Found", [("B", "2")]);
    assert!(matches!(second, Err(GatewayError::DoubleResponse)));

    // the first response is left untouched
    match start.state() {
        ResponseState::HeadersSet { status, .. } => assert_eq!(status, "200 OK"),
        other => panic!("unexpected state {:?}", other),
    }
}

#[test]
fn test_render_exact_bytes() {
    let mut start = StartResponse::new(server_headers(false));
    start.begin_response("200 OK", [("Content-Type", "text/plain")]).unwrap();

    let bytes = start.render(Body::from_chunks(["hello"])).unwrap();
    let expected = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nDate: {}\r\nServer: {}\r\n\r\nhello",
        FIXED_DATE, SERVER_SOFTWARE
    );
    assert_eq!(bytes, expected.as_bytes());
}

#[test]
fn test_render_mixes_text_and_bytes() {
    let mut start = StartResponse::new(Vec::new());
    start.begin_response("200 OK", Vec::<(String, String)>::new()).unwrap();

    let body = Body::from_chunks(vec![
        Chunk::from("text "),
        Chunk::from(b"bytes".to_vec()),
        Chunk::from(String::from(" more")),
    ]);
    let bytes = start.render(body).unwrap();
    assert_eq!(bytes, &b"HTTP/1.1 200 OK\r\n\r\ntext bytes more"[..]);
}

#[tokio::test]
async fn test_finish_sends_response_and_closes() {
    let (mut client, mut conn) = pair();

    let mut start = StartResponse::new(server_headers(false));
    start.begin_response("200 OK", [("Content-Type", "text/plain")]).unwrap();
    let sent = start.finish(&mut conn, Body::from("hello")).await.unwrap();

    assert!(conn.is_closed());
    let received = read_all(&mut client).await;
    assert_eq!(received.len(), sent);
    assert!(received.starts_with(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nDate: "));
    assert!(received.ends_with(b"\r\n\r\nhello"));
}

#[tokio::test]
async fn test_finish_before_begin_response_writes_nothing() {
    let (mut client, mut conn) = pair();

    let start = StartResponse::new(server_headers(false));
    let result = start.finish(&mut conn, Body::from("never sent")).await;

    assert!(matches!(result, Err(GatewayError::ResponseNotStarted)));
    assert!(conn.is_closed());
    assert!(read_all(&mut client).await.is_empty());
}

#[tokio::test]
async fn test_finish_closes_when_body_fails() {
    let (mut client, mut conn) = pair();

    let mut start = StartResponse::new(server_headers(false));
    start.begin_response("200 OK", Vec::<(String, String)>::new()).unwrap();

    let body = Body::from_fallible(vec![
        Ok(Chunk::from("partial")),
        Err(anyhow::anyhow!("generator blew up")),
        Ok(Chunk::from("unreachable")),
    ]);
    let result = start.finish(&mut conn, body).await;

    assert!(matches!(result, Err(GatewayError::Application(_))));
    assert!(conn.is_closed());
    assert!(read_all(&mut client).await.is_empty());
}

#[tokio::test]
async fn test_finish_with_empty_body() {
    let (mut client, mut conn) = pair();

    let mut start = StartResponse::new(Vec::new());
    start.begin_response("204 No Content", Vec::<(String, String)>::new()).unwrap();
    start.finish(&mut conn, Body::empty()).await.unwrap();

    assert_eq!(read_all(&mut client).await, b"HTTP/1.1 204 No Content\r\n\r\n");
}
