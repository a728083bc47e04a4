//! Mixcloud endpoint constants
//!
//! The endpoints are fixed; all API calls go over HTTPS to `API_DOMAIN`.

/// Host serving the REST API
pub const API_DOMAIN: &str = "api.mixcloud.com";

/// Authorization endpoint the end user is redirected to
pub const AUTHORIZE_ENDPOINT: &str = "https://mixcloud.com/oauth/authorize";

/// Token endpoint for authorization code exchange
pub const TOKEN_ENDPOINT: &str = "https://www.mixcloud.com/oauth/access_token";

/// Path of the authenticated user's profile
pub const PROFILE_PATH: &str = "me/";

/// User-Agent sent when neither the client nor the call sets one.
/// Mixcloud accepts an empty value, so none is advertised by default.
pub const DEFAULT_USER_AGENT: &str = "";
