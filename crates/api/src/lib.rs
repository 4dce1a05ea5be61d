//! Minimal client for the Jira REST API.
//!
//! A [`JiraClient`] is bound to one base URL and one set of Basic credentials.
//! [`JiraClient::request`] is the single transport primitive; the domain calls
//! (`get_issue`, `get_project_title`, `comment`) are thin projections over it.

mod comment;
mod decode;
pub mod error;
mod issue;
mod project;

pub use error::{ApiError, Result};
pub use issue::{project_from_key, Issue};
pub use reqwest::Method;

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Clone)]
pub struct JiraClient {
    client: Client,
    service_url: String,
    base_url: Url,
    user: String,
    pass: String,
}

impl fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url.as_str())
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Creates a client for `service_url`. Only the TCP connect phase is bounded by
    /// `dial_timeout`; no network I/O happens here.
    pub fn new(
        service_url: impl AsRef<str>,
        user: impl Into<String>,
        pass: impl Into<String>,
        dial_timeout: Duration,
    ) -> Result<Self> {
        let service_url = service_url.as_ref().to_owned();
        let base_url = Url::parse(&service_url).map_err(ApiError::InvalidUrl)?;

        let client = Client::builder()
            .user_agent(format!("jira-rest/{}", env!("CARGO_PKG_VERSION")))
            .connect_timeout(dial_timeout)
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            service_url,
            base_url,
            user: user.into(),
            pass: pass.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub async fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.request(Method::GET, path, &[]).await
    }

    pub async fn post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>> {
        self.request(Method::POST, path, body).await
    }

    /// Sends `body` to `service_url + path` and returns the full response body.
    ///
    /// `path` is appended verbatim to the service URL exactly as it was given to
    /// [`JiraClient::new`], so separators and escaping are the caller's job. A
    /// base without a trailing `/` therefore glues onto the last segment (or the
    /// port, which fails as [`ApiError::InvalidUrl`]). The joined string is then
    /// parsed by `url`, which resolves `.` and `..` segments before sending.
    ///
    /// 404 maps to [`ApiError::NotFound`]; every other status >= 400 maps to
    /// [`ApiError::Status`] carrying the raw body.
    pub async fn request(&self, method: Method, path: &str, body: &[u8]) -> Result<Vec<u8>> {
        let url = Url::parse(&format!("{}{}", self.service_url, path))?;

        debug!(method = %method, url = %url, "Sending request");

        let response = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .basic_auth(&self.user, Some(&self.pass))
            .body(body.to_vec())
            .send()
            .await?;

        let status = response.status();
        let data = response.bytes().await?;

        debug!(status = status.as_u16(), len = data.len(), "Received response");

        match status {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status if status.as_u16() >= 400 => Err(ApiError::Status {
                status_code: status.as_u16(),
                status: status.to_string(),
                message: String::from_utf8_lossy(&data).into_owned(),
            }),
            _ => Ok(data.to_vec()),
        }
    }
}
