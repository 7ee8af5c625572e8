//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `livefeed::adapters::mock` and adds a builder for scripting a sequence of
//! stream responses.

pub use livefeed::adapters::mock::{
    BodySender, InMemoryCredentials, MockHttpClient, MockResponse, RecordedRequest,
};
pub use livefeed::traits::{Headers, HttpClient, HttpError};

use livefeed::auth::AdminCredentials;

/// Builder for a [`MockHttpClient`] with queued responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    /// Creates a new mock HTTP configuration.
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Queues a 200 response with these chunks followed by a clean end.
    pub fn with_stream(self, chunks: &[&'static str]) -> Self {
        self.client
            .push_response(MockResponse::stream(chunks.iter().copied()));
        self
    }

    /// Queues a non-success status.
    pub fn with_status(self, status: u16) -> Self {
        self.client.push_response(MockResponse::Status(status));
        self
    }

    /// Queues a transport error.
    pub fn with_error(self, err: HttpError) -> Self {
        self.client.push_response(MockResponse::Error(err));
        self
    }

    /// Sets the response used after the queue is exhausted.
    pub fn with_default(self, response: MockResponse) -> Self {
        self.client.set_default_response(response);
        self
    }

    /// Builds the configured MockHttpClient.
    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Credentials provider holding a valid admin pair.
pub fn admin_credentials() -> InMemoryCredentials {
    InMemoryCredentials::with_credentials(AdminCredentials::new("admin", "s3cret"))
}
