//! HTTP client setup and middleware configuration.
//!
//! Every network call goes through a `reqwest` client wrapped in tracing
//! and retry middleware. Retries cover requests that fail before a
//! response arrives or that get a transient status; a body stream that
//! breaks halfway is left to the reconciler, which keeps the partial file
//! for the next run.
//!
//! # Examples
//!
//! ```rust
//! use bundlesync::http::{create_http_client, HttpClientConfig, Session};
//!
//! # fn example() -> Result<(), bundlesync::Error> {
//! let session = Session::new("token-from-browser")?;
//! let config = HttpClientConfig::default().with_session(&session)?;
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use super::session::Session;
use crate::error::Result;

use reqwest::{header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Number of retries for failed requests.
    pub retries: u32,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            proxy: None,
            headers: None,
            connect_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl HttpClientConfig {
    /// Add the session cookie to the default headers.
    pub fn with_session(mut self, session: &Session) -> Result<Self> {
        let mut headers = self.headers.take().unwrap_or_default();
        headers.extend(session.headers()?);
        self.headers = Some(headers);
        Ok(self)
    }
}

/// Creates an HTTP client with middleware configuration.
///
/// The client traces every request and retries transient failures with
/// exponential backoff, up to `config.retries` times.
pub fn create_http_client(config: HttpClientConfig) -> Result<ClientWithMiddleware> {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retries);

    let mut inner_client_builder = reqwest::Client::builder();

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    if let Some(timeout) = config.connect_timeout {
        inner_client_builder = inner_client_builder.connect_timeout(timeout);
    }

    let inner_client = inner_client_builder.build()?;

    let client = ClientBuilder::new(inner_client)
        // Trace HTTP requests. See the tracing crate to make use of these traces.
        .with(TracingMiddleware::default())
        // Retry failed requests.
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

    Ok(client)
}
