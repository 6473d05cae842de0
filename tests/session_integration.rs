//! End-to-end session tests against a scripted loopback RTSP server

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use rtsp_client::{RtspClient, RtspError, SessionConfig};

/// Run tests with `RUST_LOG=rtsp_client=debug` to see the exchanges.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Serve one connection, answering each request with the next scripted
/// response. Returns the raw request texts as received.
async fn scripted_server(responses: Vec<String>) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        for response in responses {
            // Requests from this client never carry a body.
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    return received;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let end = buf.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
            received.push(String::from_utf8_lossy(&buf[..end]).into_owned());
            buf.drain(..end);

            stream.write_all(response.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
        }

        received
    });

    (port, handle)
}

fn ok_response(extra_headers: &[(&str, &str)], body: &str) -> String {
    let mut response = String::from("RTSP/1.0 200 OK\r\nCSeq: 0\r\n");
    for (name, value) in extra_headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
    response
}

fn status_response(status: u16, reason: &str) -> String {
    format!("RTSP/1.0 {status} {reason}\r\nCSeq: 0\r\nContent-Length: 0\r\n\r\n")
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    init_tracing();
    let sdp = "v=0\r\no=- 0 0 IN IP4 127.0.0.1\r\nm=video 0 RTP/AVP 96\r\n";
    let (port, server) = scripted_server(vec![
        ok_response(&[("Session", "DEADBEEF;timeout=60")], ""),
        ok_response(&[("Public", "OPTIONS, DESCRIBE, SETUP, PLAY, TEARDOWN")], ""),
        ok_response(&[("Content-Type", "application/sdp")], sdp),
        ok_response(&[], ""),
        status_response(405, "Method Not Allowed"),
        ok_response(&[], ""),
    ])
    .await;

    let config = SessionConfig::builder("127.0.0.1")
        .port(port)
        .media_path("/live")
        .build();
    let mut client = RtspClient::new(config);

    assert!(client.open().await.unwrap());
    assert!(client.is_connected());
    assert_eq!(client.session_id(), Some("DEADBEEF"));

    let public = client.options_public().await.unwrap().unwrap();
    assert_eq!(
        public,
        vec!["OPTIONS", "DESCRIBE", "SETUP", "PLAY", "TEARDOWN"]
    );

    let description = client.describe().await.unwrap().unwrap();
    assert!(description.contains("m=video"));

    assert!(client.play().await.unwrap());
    assert_eq!(client.request_status(), Some(200));

    // This server does not implement PAUSE; the 405 is surfaced via the
    // status accessor and the session stays up.
    assert!(!client.pause().await.unwrap());
    assert_eq!(client.request_status(), Some(405));
    assert!(client.is_connected());

    assert!(client.teardown().await.unwrap());
    assert!(!client.is_connected());

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 6);

    let uri = format!("rtsp://127.0.0.1:{port}/live");
    assert!(requests[0].starts_with(&format!("SETUP {uri} RTSP/1.0\r\n")));
    assert!(requests[0].contains("Transport: RTP/AVP;unicast;client_port=6970-6971\r\n"));
    assert!(requests[0].contains("CSeq: 1\r\n"));

    assert!(requests[1].starts_with(&format!("OPTIONS {uri} RTSP/1.0\r\n")));
    assert!(requests[2].starts_with(&format!("DESCRIBE {uri} RTSP/1.0\r\n")));
    assert!(requests[3].starts_with(&format!("PLAY {uri} RTSP/1.0\r\n")));
    assert!(requests[4].starts_with(&format!("PAUSE {uri} RTSP/1.0\r\n")));
    assert!(requests[5].starts_with(&format!("TEARDOWN {uri} RTSP/1.0\r\n")));

    // Session id assigned at SETUP rides on every later request, and the
    // CSeq counter advances per request.
    for (i, request) in requests.iter().enumerate().skip(1) {
        assert!(request.contains("Session: DEADBEEF\r\n"), "{request}");
        assert!(request.contains(&format!("CSeq: {}\r\n", i + 1)), "{request}");
    }
}

#[tokio::test]
async fn test_open_fails_without_session_header() {
    init_tracing();
    let (port, server) = scripted_server(vec![ok_response(&[], "")]).await;

    let config = SessionConfig::builder("127.0.0.1").port(port).build();
    let mut client = RtspClient::new(config);

    assert!(!client.open().await.unwrap());
    assert!(!client.is_connected());
    assert!(client.session_id().is_none());

    // Subsequent verbs are refused locally.
    assert!(!client.play().await.unwrap());

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_open_fails_on_rejected_setup() {
    init_tracing();
    let (port, server) = scripted_server(vec![status_response(404, "Not Found")]).await;

    let config = SessionConfig::builder("127.0.0.1")
        .port(port)
        .media_path("/nosuch")
        .build();
    let mut client = RtspClient::new(config);

    assert!(!client.open().await.unwrap());
    assert!(!client.is_connected());
    assert_eq!(client.request_status(), Some(404));

    drop(client);
    server.await.unwrap();
}

#[tokio::test]
async fn test_open_connection_refused() {
    init_tracing();
    // Bind then drop a listener so the port is very likely closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = SessionConfig::builder("127.0.0.1").port(port).build();
    let mut client = RtspClient::new(config);

    let err = client.open().await.unwrap_err();
    assert!(matches!(err, RtspError::ConnectionFailed { .. }));
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_from_uri_session() {
    init_tracing();
    let (port, server) =
        scripted_server(vec![ok_response(&[("Session", "42")], "")]).await;

    let mut client =
        RtspClient::from_uri(&format!("rtsp://127.0.0.1:{port}/live/main")).unwrap();

    assert!(client.open().await.unwrap());
    assert_eq!(client.session_id(), Some("42"));

    drop(client);
    let requests = server.await.unwrap();
    assert!(
        requests[0].starts_with(&format!("SETUP rtsp://127.0.0.1:{port}/live/main RTSP/1.0\r\n"))
    );
}

#[tokio::test]
async fn test_drop_while_connected_sends_teardown() {
    init_tracing();
    let (port, server) = scripted_server(vec![
        ok_response(&[("Session", "S9")], ""),
        ok_response(&[], ""),
    ])
    .await;

    let config = SessionConfig::builder("127.0.0.1").port(port).build();
    let mut client = RtspClient::new(config);

    assert!(client.open().await.unwrap());
    drop(client);

    // The cleanup request runs on a spawned task; the server observes it.
    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].starts_with("TEARDOWN "));
    assert!(requests[1].contains("Session: S9\r\n"));
}
