//! Streaming HTTP transport trait abstraction.
//!
//! The live client never talks to an HTTP library directly. It asks an
//! [`HttpClient`] for a streaming response, which lets tests script
//! responses with the mock adapter.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Incrementally delivered response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Response whose body is read chunk by chunk.
pub struct StreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Body stream; `None` when the response has no readable body
    pub body: Option<ByteStream>,
}

impl StreamResponse {
    /// Create a response with a body stream.
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Some(body),
        }
    }

    /// Create a response without a body.
    pub fn without_body(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Attach response headers.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// HTTP transport errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed (DNS, refused, TLS)
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned an error status
    ServerError { status: u16, message: String },
    /// Request was cancelled
    Cancelled,
    /// IO error while reading the body
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Cancelled => write!(f, "Request cancelled"),
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for a byte-streaming HTTP transport.
///
/// Implementations must send every supplied header verbatim, since the
/// live feed authenticates through custom headers.
///
/// # Example
///
/// ```ignore
/// use livefeed::traits::{Headers, HttpClient};
///
/// async fn status<C: HttpClient>(client: &C) -> Option<u16> {
///     let response = client.get_stream("http://localhost:8080/live", &Headers::new()).await.ok()?;
///     Some(response.status)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and return the response with its body unread.
    ///
    /// A non-success status is not an error at this level; callers inspect
    /// [`StreamResponse::status`].
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_body() -> ByteStream {
        Box::pin(futures::stream::empty())
    }

    #[test]
    fn test_stream_response_new() {
        let response = StreamResponse::new(200, empty_body());
        assert_eq!(response.status, 200);
        assert!(response.body.is_some());
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_stream_response_without_body() {
        let response = StreamResponse::without_body(204);
        assert!(response.body.is_none());
    }

    #[test]
    fn test_stream_response_is_success() {
        assert!(StreamResponse::without_body(200).is_success());
        assert!(StreamResponse::without_body(299).is_success());
        assert!(!StreamResponse::without_body(301).is_success());
        assert!(!StreamResponse::without_body(401).is_success());
        assert!(!StreamResponse::without_body(503).is_success());
    }

    #[test]
    fn test_stream_response_header_lookup() {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "text/event-stream".to_string());
        let response = StreamResponse::without_body(200).with_headers(headers);
        assert_eq!(response.header("Content-Type"), Some("text/event-stream"));
        assert_eq!(response.header("X-Missing"), None);
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            HttpError::ServerError {
                status: 500,
                message: "Internal Error".to_string()
            }
            .to_string(),
            "Server error (500): Internal Error"
        );
        assert_eq!(HttpError::Cancelled.to_string(), "Request cancelled");
        assert_eq!(
            HttpError::Io("reset".to_string()).to_string(),
            "IO error: reset"
        );
    }
}
