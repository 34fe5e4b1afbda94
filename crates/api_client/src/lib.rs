//! Typed client for the audition and signal-bank REST endpoints.
//!
//! The HTTP layer sits behind [`Transport`] so the components above it can be
//! exercised without a network. [`HttpTransport`] is the reqwest-backed
//! implementation used in production.

pub mod base;
pub mod client;
pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod transport;

pub use base::{ApiBase, PageLocation};
pub use client::ApiClient;
pub use error::{ClientError, Result};
#[cfg(feature = "mock")]
pub use mock::MockTransport;
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};
