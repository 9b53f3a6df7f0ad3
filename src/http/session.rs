//! Storefront session credential.
//!
//! Logging in is done out of band; the resulting session cookie value is
//! handed to bundlesync either directly or through a token file. The
//! [`Session`] is passed explicitly to whatever builds an HTTP client.

use crate::error::{Error, Result};

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Name of the storefront's session cookie.
pub const SESSION_COOKIE: &str = "_simpleauth_sess";

/// An authenticated storefront session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    /// Wrap a session token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(Error::Session("empty session token".into()));
        }
        Ok(Self { token })
    }

    /// Read the token from a file, as left by a previous login.
    pub fn from_token_file(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(token) => Self::new(token),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::Session(format!(
                "no session token at {}, log in and save the {} cookie there",
                path.display(),
                SESSION_COOKIE
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Session token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// `Cookie` header value carrying the session.
    pub fn cookie_header(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, self.token))
            .map_err(|e| Error::Session(format!("token is not a valid cookie value: {}", e)))
    }

    /// Headers every authenticated request carries.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, self.cookie_header()?);
        Ok(headers)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}
