//! URL construction for API, authorization, and token endpoints
//!
//! Query strings are `application/x-www-form-urlencoded` and keep the order
//! the parameters were given in. Optional values that are absent (callback
//! URL, access token) are sent as empty parameters rather than dropped.

use url::form_urlencoded;

use crate::client::ClientCredentials;
use crate::constants::{API_DOMAIN, AUTHORIZE_ENDPOINT, TOKEN_ENDPOINT};

/// Build a fully-qualified API URL from a path and query parameters.
///
/// The path always ends up with exactly one leading slash. The `?` is only
/// appended when there are parameters.
pub fn build_url(path: &str, params: &[(&str, &str)]) -> String {
    let path = path.trim_start_matches('/');
    let mut url = format!("https://{API_DOMAIN}/{path}");
    if !params.is_empty() {
        url.push('?');
        url.push_str(&encode_query(params));
    }
    url
}

/// URL the end user is sent to in order to authorize the application.
pub fn authorization_uri(credentials: &ClientCredentials) -> String {
    let query = encode_query(&[
        ("client_id", credentials.client_id()),
        ("redirect_uri", credentials.callback_url().unwrap_or_default()),
    ]);
    format!("{AUTHORIZE_ENDPOINT}?{query}")
}

/// Token endpoint URL for exchanging `code`.
///
/// Mixcloud takes the exchange parameters in the query string of a GET, not
/// in a form body.
pub fn token_exchange_url(credentials: &ClientCredentials, code: &str) -> String {
    let query = encode_query(&[
        ("client_id", credentials.client_id()),
        ("redirect_uri", credentials.callback_url().unwrap_or_default()),
        ("client_secret", credentials.client_secret()),
        ("code", code),
    ]);
    format!("{TOKEN_ENDPOINT}?{query}")
}

/// Serialize parameters as a form-urlencoded query string (no leading `?`).
pub fn encode_query(params: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// Strip the query string so secrets and tokens stay out of logs.
pub(crate) fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Secret;

    fn credentials(callback_url: Option<&str>) -> ClientCredentials {
        ClientCredentials::new(
            "abc",
            Secret::new(String::from("s3cret")),
            callback_url.map(String::from),
        )
    }

    #[test]
    fn build_url_adds_single_leading_slash() {
        assert_eq!(build_url("me/", &[]), "https://api.mixcloud.com/me/");
        assert_eq!(build_url("/me/", &[]), "https://api.mixcloud.com/me/");
        assert_eq!(
            build_url("//spartacus/cloudcasts/", &[]),
            "https://api.mixcloud.com/spartacus/cloudcasts/"
        );
    }

    #[test]
    fn build_url_without_params_has_no_question_mark() {
        let url = build_url("popular", &[]);
        assert!(!url.contains('?'), "got: {url}");
    }

    #[test]
    fn build_url_encodes_params_in_order() {
        let params = [("access_token", "a b/c"), ("limit", "10")];
        let url = build_url("me/", &params);
        assert_eq!(
            url,
            "https://api.mixcloud.com/me/?access_token=a+b%2Fc&limit=10"
        );

        let (_, query) = url.split_once('?').unwrap();
        let decoded: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(
            decoded,
            vec![
                ("access_token".to_string(), "a b/c".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn build_url_keeps_empty_values() {
        assert_eq!(
            build_url("me/", &[("access_token", "")]),
            "https://api.mixcloud.com/me/?access_token="
        );
    }

    #[test]
    fn authorization_uri_matches_known_value() {
        let uri = authorization_uri(&credentials(Some("https://app.example/cb")));
        assert_eq!(
            uri,
            "https://mixcloud.com/oauth/authorize?client_id=abc&redirect_uri=https%3A%2F%2Fapp.example%2Fcb"
        );
    }

    #[test]
    fn authorization_uri_has_exactly_client_id_and_redirect_uri() {
        let uri = authorization_uri(&credentials(Some("https://app.example/cb")));
        let (base, query) = uri.split_once('?').unwrap();
        assert_eq!(base, AUTHORIZE_ENDPOINT);

        let keys: Vec<String> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, _)| k.into_owned())
            .collect();
        assert_eq!(keys, vec!["client_id", "redirect_uri"]);
    }

    #[test]
    fn authorization_uri_without_callback_sends_empty_redirect() {
        let uri = authorization_uri(&credentials(None));
        assert!(uri.ends_with("?client_id=abc&redirect_uri="), "got: {uri}");
    }

    #[test]
    fn token_exchange_url_carries_all_parameters() {
        let url = token_exchange_url(&credentials(Some("https://app.example/cb")), "c0de");
        assert_eq!(
            url,
            "https://www.mixcloud.com/oauth/access_token?client_id=abc&redirect_uri=https%3A%2F%2Fapp.example%2Fcb&client_secret=s3cret&code=c0de"
        );
    }

    #[test]
    fn redact_strips_query() {
        assert_eq!(
            redact("https://api.mixcloud.com/me/?access_token=tok"),
            "https://api.mixcloud.com/me/"
        );
        assert_eq!(redact("https://api.mixcloud.com/me/"), "https://api.mixcloud.com/me/");
    }
}
