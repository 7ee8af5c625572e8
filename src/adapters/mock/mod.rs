//! Mock implementations for testing.
//!
//! These implement the trait abstractions without network or file system
//! access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - Scripted streaming responses with request recording
//! - [`InMemoryCredentials`] - In-memory header provider

pub mod credentials;
pub mod http;

pub use credentials::InMemoryCredentials;
pub use http::{BodySender, MockHttpClient, MockResponse, RecordedRequest};
