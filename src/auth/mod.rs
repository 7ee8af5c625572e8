//! Authentication for the live feed.
//!
//! - [`AdminCredentials`] turns a username/password pair into request headers
//! - [`CredentialsManager`] persists them under the home directory

pub mod credentials;

pub use credentials::{AdminCredentials, CredentialsManager, PASSWORD_HEADER, USERNAME_HEADER};
