//! Error handling for livefeed.
//!
//! - **Error Categories**: High-level classification for logging and messaging
//! - **Stream Errors**: Why a single connection attempt ended
//! - **Unified Error Type**: `LiveError` for setup paths, with `LiveResult<T>`
//!
//! # Error Categories
//!
//! | Category | Description | Transient |
//! |----------|-------------|-----------|
//! | Network | Connection, DNS, timeout, read failure | Yes |
//! | Server | Non-success status, empty body | Yes |
//! | Auth | Missing or rejected credentials | No |
//! | Configuration | Bad URL or backoff settings | No |
//! | System | Filesystem errors | No |
//!
//! The live client retries every stream error regardless of category; only
//! `close()` stops it.

mod category;
mod live_error;
mod stream;

pub use category::ErrorCategory;
pub use live_error::{LiveError, LiveResult};
pub use stream::StreamError;
