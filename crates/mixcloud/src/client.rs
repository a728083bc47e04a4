//! Mixcloud API client
//!
//! `MixcloudClient` owns three things:
//! - immutable `ClientCredentials` (client id, secret, callback URL)
//! - the `Transport` used for every request
//! - a `Session` holding the access token and the last response snapshot
//!
//! Every operation that touches the session takes `&mut self`, so a client
//! cannot be driven from two tasks at once without the caller adding its own
//! synchronization.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use common::Secret;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::constants::{DEFAULT_USER_AGENT, PROFILE_PATH};
use crate::error::Result;
use crate::response::HttpResponse;
use crate::token::TokenResponse;
use crate::transport::{ReqwestTransport, RequestOptions, Transport};
use crate::uri::{authorization_uri, build_url, redact, token_exchange_url};

/// Application credentials registered with Mixcloud.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: Secret<String>,
    /// Required in practice for the OAuth flow; Mixcloud redirects here with the code
    callback_url: Option<String>,
}

impl ClientCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: Secret<String>,
        callback_url: Option<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            callback_url,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose()
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }
}

/// Mutable per-client state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    access_token: Option<Secret<String>>,
    last_response: Option<HttpResponse>,
}

impl Session {
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(|t| t.expose().as_str())
    }

    /// Most recent HTTP exchange, overwritten by every request (including rejected ones).
    pub fn last_response(&self) -> Option<&HttpResponse> {
        self.last_response.as_ref()
    }
}

/// Client for the Mixcloud API.
pub struct MixcloudClient {
    credentials: ClientCredentials,
    transport: Arc<dyn Transport>,
    user_agent: String,
    session: Session,
}

impl fmt::Debug for MixcloudClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixcloudClient")
            .field("credentials", &self.credentials)
            .field("user_agent", &self.user_agent)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl MixcloudClient {
    /// Client using an unpooled reqwest transport.
    pub fn new(credentials: ClientCredentials) -> Result<Self> {
        let transport = ReqwestTransport::unpooled()?;
        Ok(Self::with_transport(credentials, Arc::new(transport)))
    }

    pub fn with_transport(credentials: ClientCredentials, transport: Arc<dyn Transport>) -> Self {
        Self {
            credentials,
            transport,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            session: Session::default(),
        }
    }

    /// Default User-Agent for requests that don't set their own.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn last_response(&self) -> Option<&HttpResponse> {
        self.session.last_response()
    }

    /// URL to redirect the end user to for authorization. No network call.
    pub fn authorization_uri(&self) -> String {
        authorization_uri(&self.credentials)
    }

    /// Exchange an authorization code for an access token and store it.
    ///
    /// On any failure the stored token is left as it was.
    #[instrument(skip_all)]
    pub async fn exchange_code_for_token(&mut self, code: &str) -> Result<TokenResponse> {
        let url = token_exchange_url(&self.credentials, code);
        let response = self
            .request(&url, RequestOptions::default().without_auth_token())
            .await?;

        let token = TokenResponse::from_json(response.json()?).inspect_err(|e| {
            warn!(error = %e, "token endpoint returned no access token");
        })?;

        self.session.access_token = Some(Secret::new(token.access_token.clone()));
        info!("access token stored");
        Ok(token)
    }

    /// Exchange `code` and return only the access token.
    pub async fn access_token(&mut self, code: &str) -> Result<String> {
        self.exchange_code_for_token(code)
            .await
            .map(|token| token.access_token)
    }

    /// Use a token obtained elsewhere, skipping the OAuth exchange. Not validated.
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.session.access_token = Some(Secret::new(token.into()));
    }

    pub fn current_access_token(&self) -> Option<&str> {
        self.session.access_token()
    }

    pub fn clear_access_token(&mut self) {
        self.session.access_token = None;
    }

    /// Issue a request to a fully-built URL and validate its status.
    ///
    /// The response is recorded as the last response before validation, so a
    /// rejected status can still be inspected afterwards.
    pub async fn request(&mut self, url: &str, options: RequestOptions) -> Result<HttpResponse> {
        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(|| self.user_agent.clone());
        let options = RequestOptions {
            user_agent: Some(user_agent),
            ..options
        };

        let started = Instant::now();
        let raw = match self.transport.execute(url, &options).await {
            Ok(raw) => raw,
            Err(e) => {
                crate::metrics::record_transport_error("http");
                warn!(url = %redact(url), error = %e, "request failed");
                return Err(e);
            }
        };
        crate::metrics::record_request(raw.status, started.elapsed().as_secs_f64());

        let response = HttpResponse::from_raw(
            raw.status,
            &raw.data,
            raw.header_size,
            options.capture_headers,
        );
        debug!(
            url = %redact(url),
            status = response.status,
            headers = response.headers.len(),
            "request completed"
        );
        self.session.last_response = Some(response.clone());

        if let Err(e) = response.validate() {
            warn!(url = %redact(url), status = response.status, "rejected response status");
            return Err(e);
        }
        Ok(response)
    }

    /// GET an API path with the stored access token and decode the JSON body.
    ///
    /// Without a stored token the `access_token` parameter is sent empty.
    pub async fn get(&mut self, path: &str) -> Result<Value> {
        self.get_with_options(path, RequestOptions::default()).await
    }

    pub async fn get_with_options(&mut self, path: &str, options: RequestOptions) -> Result<Value> {
        let url = if options.include_auth_token {
            let token = self.current_access_token().unwrap_or_default();
            build_url(path, &[("access_token", token)])
        } else {
            build_url(path, &[])
        };
        self.request(&url, options).await?.json()
    }

    /// Profile of the user the access token belongs to.
    pub async fn get_user(&mut self) -> Result<Value> {
        self.get(PROFILE_PATH).await
    }
}
