//! Live storefront access.

use super::Storefront;
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig, Session};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;

/// Storefront the tool talks to unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "https://www.humblebundle.com/";

static GAMEKEYS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"gamekeys\s*:\s*\[([^\]]*)\]").expect("valid regex"));
static KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([A-Za-z0-9]+)""#).expect("valid regex"));

/// Extract the bundle keys embedded in the library page.
///
/// Returns `None` when the page carries no key array, which is what a
/// logged-out visitor gets.
///
/// ```rust
/// use bundlesync::storefront::parse_bundle_keys;
///
/// let page = r#"<script>var data = { gamekeys: ["abc123", "XYZ789"], other: 1 };</script>"#;
/// assert_eq!(parse_bundle_keys(page), Some(vec!["abc123".into(), "XYZ789".into()]));
/// assert_eq!(parse_bundle_keys("<html>please log in</html>"), None);
/// ```
pub fn parse_bundle_keys(page: &str) -> Option<Vec<String>> {
    let list = GAMEKEYS.captures(page)?.get(1)?.as_str();
    Some(
        KEY.captures_iter(list)
            .map(|c| c[1].to_string())
            .collect(),
    )
}

/// Storefront reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorefront {
    client: ClientWithMiddleware,
    base_url: Url,
}

impl HttpStorefront {
    /// Use an existing client, which must already carry the session cookie.
    pub fn new(client: ClientWithMiddleware, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url).map_err(|e| {
            Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", base_url, e))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    /// Build a client carrying `session` and wrap it.
    pub fn with_session(
        session: &Session,
        config: HttpClientConfig,
        base_url: &str,
    ) -> Result<Self> {
        let client = create_http_client(config.with_session(session)?)?;
        Self::new(client, base_url)
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        debug!("GET {}", url);
        let res = self.client.get(url.as_str()).send().await?;
        let status = res.status();
        match status {
            s if s.is_success() => Ok(res),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Session(format!(
                "{} refused the session token (HTTP {})",
                url, status
            ))),
            _ => Err(Error::Network {
                url: url.to_string(),
                status,
            }),
        }
    }
}

#[async_trait]
impl Storefront for HttpStorefront {
    async fn list_bundle_keys(&self) -> Result<Vec<String>> {
        let page = self.get(self.endpoint("home")?).await?.text().await?;
        let keys = parse_bundle_keys(&page).ok_or_else(|| {
            Error::Session("no bundle keys on the library page, the session token may have expired".into())
        })?;
        debug!("Found {} bundle keys", keys.len());
        Ok(keys)
    }

    async fn get_order(&self, key: &str) -> Result<serde_json::Value> {
        let url = self.endpoint(&format!("api/v1/order/{}", key))?;
        Ok(self.get(url).await?.json().await?)
    }
}
