// Tests for the reqwest transport against a local HTTP server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use futures::StreamExt;
use livefeed::adapters::ReqwestHttpClient;
use livefeed::auth::AdminCredentials;
use livefeed::live::{
    create_live_client, ChannelListener, LiveNotification, SessionRequest, SessionSignal,
    StreamSession,
};
use livefeed::{FrameDecoder, LiveConfig, StreamError};
use tokio::sync::mpsc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIVE_PATH: &str = "/api/admin/sessions/live";

fn sse_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

#[tokio::test]
async fn test_get_stream_body_decodes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIVE_PATH))
        .and(header("accept", "text/event-stream"))
        .respond_with(sse_response(
            "id: 42\nevent: attendance-marked\ndata: {\"present\":12}\n\n: keep-alive\n\nid: 43\nevent: ping\n\n",
        ))
        .mount(&mock_server)
        .await;

    let client = ReqwestHttpClient::new();
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), "text/event-stream".to_string());
    let url = format!("{}{}", mock_server.uri(), LIVE_PATH);
    let response = client.get_stream(&url, &headers).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Type"), Some("text/event-stream"));

    let mut body = response.body.expect("body should be present");
    let mut decoder = FrameDecoder::new();
    let mut events = Vec::new();
    while let Some(chunk) = body.next().await {
        events.extend(decoder.feed(&chunk.unwrap()));
    }

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id.as_deref(), Some("42"));
    assert_eq!(events[0].event_type, "attendance-marked");
    assert_eq!(
        events[0].data.structured().and_then(|v| v["present"].as_i64()),
        Some(12)
    );
    assert!(events[1].is_heartbeat());
    assert!(decoder.is_drained());
}

#[tokio::test]
async fn test_error_status_is_a_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("denied"))
        .mount(&mock_server)
        .await;

    let client = ReqwestHttpClient::new();
    let url = format!("{}{}", mock_server.uri(), LIVE_PATH);
    let response = client.get_stream(&url, &Headers::new()).await.unwrap();

    assert_eq!(response.status, 401);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_empty_body_reports_missing_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let http = Arc::new(ReqwestHttpClient::new());
    let url = format!("{}{}", mock_server.uri(), LIVE_PATH);

    let response = http.get_stream(&url, &Headers::new()).await.unwrap();
    assert!(response.body.is_none());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handle = StreamSession::open(http, SessionRequest::new(url, Headers::new()), tx);
    let signal = tokio::time::timeout(NOTIFY_TIMEOUT, rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        signal,
        SessionSignal::Failed(StreamError::MissingBody { status: 200 })
    );
}

#[tokio::test]
async fn test_connection_refused() {
    let client = ReqwestHttpClient::with_connect_timeout(Duration::from_secs(2)).unwrap();
    let result = client
        .get_stream("http://127.0.0.1:1/api/admin/sessions/live", &Headers::new())
        .await;

    assert!(matches!(
        result,
        Err(HttpError::ConnectionFailed(_)) | Err(HttpError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_client_resumes_against_server() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIVE_PATH))
        .and(header("x-auth-username", "admin"))
        .and(header("x-auth-password", "s3cret"))
        .respond_with(sse_response(
            "id: 7\nevent: session-started\ndata: {\"message\":\"Session 3 started\"}\n\n",
        ))
        .mount(&mock_server)
        .await;

    let config = LiveConfig::default()
        .with_base_url(mock_server.uri())
        .with_backoff(fast_backoff());
    let (listener, mut rx) = ChannelListener::new();
    let client = create_live_client(
        &config,
        Arc::new(ReqwestHttpClient::new()),
        AdminCredentials::new("admin", "s3cret"),
        Arc::new(listener),
    )
    .unwrap();

    client.connect();

    let mut opens = 0;
    while opens < 2 {
        match next_notification(&mut rx).await {
            LiveNotification::Open(_) => opens += 1,
            LiveNotification::Error(err) => panic!("unexpected error {:?}", err),
            _ => {}
        }
    }
    client.close();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.len() >= 2);
    assert!(requests[0].headers.get("last-event-id").is_none());
    assert_eq!(
        requests[1]
            .headers
            .get("last-event-id")
            .and_then(|v| v.to_str().ok()),
        Some("7")
    );
}
