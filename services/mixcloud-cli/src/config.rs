//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret is loaded from MIXCLOUD_CLIENT_SECRET or
//! client_secret_file, never stored in the TOML directly to avoid leaking it.

use common::Secret;
use mixcloud::ClientCredentials;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CLIENT_SECRET_ENV: &str = "MIXCLOUD_CLIENT_SECRET";
pub const ACCESS_TOKEN_ENV: &str = "MIXCLOUD_ACCESS_TOKEN";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub client: ClientConfig,
}

/// Mixcloud application settings
#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to MIXCLOUD_CLIENT_SECRET)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub user_agent: String,
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. MIXCLOUD_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if config.client.client_id.trim().is_empty() {
            return Err(common::Error::Config("client_id must not be empty".into()));
        }

        if let Some(ref callback) = config.client.callback_url
            && !callback.starts_with("http://")
            && !callback.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "callback_url must start with http:// or https://, got: {callback}"
            )));
        }

        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            config.client.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.client.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.client.client_secret = Some(Secret::new(secret));
            }
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("mixcloud.toml")
    }

    /// Credentials for the client library. Consumes the resolved secret.
    pub fn credentials(&mut self) -> common::Result<ClientCredentials> {
        let secret = self.client.client_secret.take().ok_or_else(|| {
            common::Error::MissingSecret(format!(
                "set {CLIENT_SECRET_ENV} or client_secret_file"
            ))
        })?;
        Ok(ClientCredentials::new(
            self.client.client_id.clone(),
            secret,
            self.client.callback_url.clone(),
        ))
    }
}

/// Access token from the --token arg, else MIXCLOUD_ACCESS_TOKEN.
pub fn resolve_access_token(cli_token: Option<&str>) -> Option<String> {
    cli_token
        .map(str::to_owned)
        .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok())
        .filter(|t| !t.is_empty())
}
