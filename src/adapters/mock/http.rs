//! Mock streaming HTTP client for testing.
//!
//! Responses are scripted per call: queued responses are used first, in
//! order, then the default response. Channel-fed bodies let a test decide
//! exactly when each chunk arrives and when the stream ends.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, StreamResponse};

/// Sender half of a channel-fed response body.
pub type BodySender = mpsc::UnboundedSender<Result<Bytes, HttpError>>;

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
}

impl RecordedRequest {
    /// Look up a header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Configuration for a mock response.
#[derive(Debug)]
pub enum MockResponse {
    /// 200 with these chunks, then a clean end of stream
    Stream(Vec<Bytes>),
    /// 200 with these chunks, then a read error
    StreamThenError(Vec<Bytes>, HttpError),
    /// 200 whose body is fed through a channel; dropping the sender ends it
    Channel(mpsc::UnboundedReceiver<Result<Bytes, HttpError>>),
    /// 200 whose body never yields and never ends
    Pending,
    /// A non-streaming response with this status
    Status(u16),
    /// 200 without a body
    NoBody,
    /// Transport error before any response
    Error(HttpError),
}

impl MockResponse {
    /// Build a [`MockResponse::Stream`] from anything convertible to bytes.
    pub fn stream<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        MockResponse::Stream(chunks.into_iter().map(Into::into).collect())
    }

    /// Copy the response for reuse as a default. Channel bodies cannot be
    /// copied.
    fn duplicate(&self) -> Option<Self> {
        match self {
            MockResponse::Stream(chunks) => Some(MockResponse::Stream(chunks.clone())),
            MockResponse::StreamThenError(chunks, err) => {
                Some(MockResponse::StreamThenError(chunks.clone(), err.clone()))
            }
            MockResponse::Channel(_) => None,
            MockResponse::Pending => Some(MockResponse::Pending),
            MockResponse::Status(status) => Some(MockResponse::Status(*status)),
            MockResponse::NoBody => Some(MockResponse::NoBody),
            MockResponse::Error(err) => Some(MockResponse::Error(err.clone())),
        }
    }

    fn into_result(self) -> Result<StreamResponse, HttpError> {
        let body: ByteStream = match self {
            MockResponse::Error(err) => return Err(err),
            MockResponse::Status(status) => return Ok(StreamResponse::without_body(status)),
            MockResponse::NoBody => return Ok(StreamResponse::without_body(200)),
            MockResponse::Stream(chunks) => {
                Box::pin(futures::stream::iter(
                    chunks.into_iter().map(Ok::<Bytes, HttpError>),
                ))
            }
            MockResponse::StreamThenError(chunks, err) => {
                let items = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(err)));
                Box::pin(futures::stream::iter(items))
            }
            MockResponse::Channel(rx) => {
                Box::pin(futures::stream::unfold(rx, |mut rx| async move {
                    rx.recv().await.map(|item| (item, rx))
                }))
            }
            MockResponse::Pending => Box::pin(futures::stream::pending::<Result<Bytes, HttpError>>()),
        };

        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "text/event-stream".to_string());
        Ok(StreamResponse::new(200, body).with_headers(headers))
    }
}

/// Mock streaming HTTP client for testing.
///
/// Clones share the same queue and request log.
///
/// # Example
///
/// ```ignore
/// use livefeed::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.push_response(MockResponse::stream(vec!["id: 1\ndata: hi\n\n"]));
/// client.set_default_response(MockResponse::Status(503));
///
/// // ... run the code under test ...
///
/// assert_eq!(client.get_requests()[0].header("accept"), Some("text/event-stream"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Responses consumed one per request
    queue: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Response used once the queue is empty
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered request.
    pub fn push_response(&self, response: MockResponse) {
        self.queue.lock().unwrap().push_back(response);
    }

    /// Queue a channel-fed response and return its sender.
    pub fn push_channel_response(&self) -> BodySender {
        let (tx, rx) = mpsc::unbounded_channel();
        self.push_response(MockResponse::Channel(rx));
        tx
    }

    /// Set the response used when the queue is empty.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Wait until at least `count` requests were made.
    ///
    /// Returns false if `timeout` elapses first.
    pub async fn wait_for_requests(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.request_count() >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
        });
    }

    fn next_response(&self) -> Option<MockResponse> {
        if let Some(response) = self.queue.lock().unwrap().pop_front() {
            return Some(response);
        }
        self.default_response
            .lock()
            .unwrap()
            .as_ref()
            .and_then(MockResponse::duplicate)
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError> {
        self.record_request("GET", url, headers);

        match self.next_response() {
            Some(response) => response.into_result(),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
