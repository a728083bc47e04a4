//! Mixcloud API client library
//!
//! Wraps the Mixcloud OAuth 2.0 authorization code flow and authenticated GET
//! requests against `api.mixcloud.com`. The library holds no global state and
//! persists nothing: the caller owns the `MixcloudClient` and with it the
//! access token and the last response snapshot.
//!
//! Flow:
//! 1. Redirect the user to `MixcloudClient::authorization_uri()`
//! 2. Mixcloud redirects back to the callback URL with a `code`
//! 3. `MixcloudClient::access_token(code)` exchanges and stores the token
//! 4. `MixcloudClient::get(path)` / `get_user()` call the API with the token
//!
//! A token obtained earlier can be supplied with `set_access_token()` to skip
//! steps 1-3.

pub mod client;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod response;
pub mod token;
pub mod transport;
pub mod uri;

pub use client::{ClientCredentials, MixcloudClient, Session};
pub use constants::*;
pub use error::{Error, Result};
pub use response::{HttpResponse, is_success_status, parse_headers};
pub use token::TokenResponse;
pub use transport::{RawResponse, ReqwestTransport, RequestOptions, Transport};
pub use uri::{authorization_uri, build_url};
