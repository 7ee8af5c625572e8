//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Byte-streaming HTTP transport
//! - [`HeaderProvider`] - Per-request authentication headers

pub mod credentials;
pub mod http;

pub use credentials::{CredentialsError, HeaderProvider, NoAuth};
pub use http::{ByteStream, Headers, HttpClient, HttpError, StreamResponse};
