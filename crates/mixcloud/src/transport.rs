//! HTTP transport abstraction
//!
//! The client never talks to reqwest directly. It hands a fully-built URL and
//! `RequestOptions` to a `Transport` and gets back the raw payload: the header
//! block followed by the body, plus the header block length. Authentication is
//! not the transport's concern; whether the token goes into the URL is decided
//! by the caller building the URL.
//!
//! Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility (`Arc<dyn Transport>`).

use std::future::Future;
use std::pin::Pin;

use bytes::{BufMut, Bytes, BytesMut};
use reqwest::header::{HeaderValue, USER_AGENT};
use tracing::{debug, instrument};

use crate::constants::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};
use crate::uri::redact;

/// Per-request options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Append the stored access token to the query string (honored by the client)
    pub include_auth_token: bool,
    /// Return the header block ahead of the body
    pub capture_headers: bool,
    /// Overrides the client's default User-Agent when set
    pub user_agent: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            include_auth_token: true,
            capture_headers: true,
            user_agent: None,
        }
    }
}

impl RequestOptions {
    pub fn without_auth_token(mut self) -> Self {
        self.include_auth_token = false;
        self
    }

    pub fn without_headers(mut self) -> Self {
        self.capture_headers = false;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// User-Agent to send: the per-request value, else `default`.
    pub fn user_agent_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.user_agent.as_deref().unwrap_or(default)
    }
}

/// Raw output of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Length of the header block at the start of `data` (0 when not captured)
    pub header_size: usize,
    pub data: Bytes,
}

impl RawResponse {
    /// Response whose payload is only a body.
    pub fn body_only(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            header_size: 0,
            data: body.into(),
        }
    }
}

/// Issues one GET per call and returns the raw response.
///
/// Implementations must not retry, and every non-network outcome (including
/// 4xx/5xx) is an `Ok` carrying the status; status validation belongs to the
/// caller.
pub trait Transport: Send + Sync {
    fn execute<'a>(
        &'a self,
        url: &'a str,
        options: &'a RequestOptions,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse>> + Send + 'a>>;
}

/// Transport backed by `reqwest`.
///
/// Built with `unpooled()`, no connection is kept idle between calls: each
/// request opens its own connection and releases it once the body is read.
/// Timeouts are reqwest's defaults.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport whose client never reuses a connection across calls.
    pub fn unpooled() -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| Error::Http(format!("building HTTP client failed: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap a caller-configured client; its pool settings apply as given.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    #[instrument(
        skip_all,
        fields(request_id = %uuid::Uuid::new_v4(), url = %redact(url))
    )]
    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<RawResponse> {
        let user_agent = HeaderValue::from_str(options.user_agent_or(DEFAULT_USER_AGENT))
            .map_err(|e| Error::Http(format!("invalid user agent: {e}")))?;

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| Error::Http(format!("request failed: {}", e.without_url())))?;

        let status = response.status().as_u16();
        let head = options.capture_headers.then(|| render_head(&response));

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("reading response body failed: {}", e.without_url())))?;

        debug!(status, body_len = body.len(), "response received");

        Ok(match head {
            Some(head) => {
                let header_size = head.len();
                let mut data = BytesMut::with_capacity(header_size + body.len());
                data.put_slice(head.as_bytes());
                data.put_slice(&body);
                RawResponse {
                    status,
                    header_size,
                    data: data.freeze(),
                }
            }
            None => RawResponse::body_only(status, body),
        })
    }
}

impl Transport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        url: &'a str,
        options: &'a RequestOptions,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse>> + Send + 'a>> {
        Box::pin(self.fetch(url, options))
    }
}

/// Render the status line and headers as an HTTP/1.x style header block.
fn render_head(response: &reqwest::Response) -> String {
    let status = response.status();
    let mut head = format!(
        "{:?} {} {}\r\n",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );
    for (name, value) in response.headers() {
        head.push_str(name.as_str());
        head.push_str(": ");
        head.push_str(&String::from_utf8_lossy(value.as_bytes()));
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    head
}
