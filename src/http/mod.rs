//! HTTP module: client construction and the session credential.
//!
//! - [`client`] - Client creation with retry and tracing middleware
//! - [`session`] - The storefront session cookie

pub mod client;
pub mod session;

pub use client::{create_http_client, HttpClientConfig};
pub use session::{Session, SESSION_COOKIE};
