//! Mixcloud command-line client
//!
//! Thin host around the `mixcloud` library:
//! 1. `mixcloud authorize-url` prints the URL to send the user to
//! 2. `mixcloud exchange <code>` trades the returned code for an access token
//! 3. `mixcloud me` / `mixcloud get <path>` call the API with that token
//!
//! Tokens are printed, never written to disk; pass them back with `--token`
//! or MIXCLOUD_ACCESS_TOKEN.

mod config;
mod metrics;

use anyhow::{Context, Result, bail};
use mixcloud::MixcloudClient;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, resolve_access_token};

const USAGE: &str = "usage: mixcloud [--config <path>] [--token <token>] \
<authorize-url | exchange <code> | me | get <path>>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    AuthorizeUrl,
    Exchange { code: String },
    Me,
    Get { path: String },
}

#[derive(Debug, PartialEq, Eq)]
struct Cli {
    config: Option<String>,
    token: Option<String>,
    command: Command,
}

/// Simple flag parsing: `--config` and `--token` take a value, the rest are positional.
fn parse_args(args: &[String]) -> Result<Cli> {
    let mut config = None;
    let mut token = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(iter.next().context("--config requires a path")?.clone());
            }
            "--token" => {
                token = Some(iter.next().context("--token requires a value")?.clone());
            }
            flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
            _ => positional.push(arg.as_str()),
        }
    }

    let command = match positional.as_slice() {
        ["authorize-url"] => Command::AuthorizeUrl,
        ["exchange", code] => Command::Exchange {
            code: code.to_string(),
        },
        ["me"] => Command::Me,
        ["get", path] => Command::Get {
            path: path.to_string(),
        },
        _ => bail!(USAGE),
    };

    Ok(Cli {
        config,
        token,
        command,
    })
}

/// Log the rejected body before handing the error to anyhow.
fn report(err: mixcloud::Error) -> anyhow::Error {
    if let Some(body) = err.body() {
        error!(status = err.status(), body, "Mixcloud rejected the request");
    }
    anyhow::Error::new(err)
}

/// GET `path`, or the profile when `None`, with the configured token.
async fn fetch_json(
    client: &mut MixcloudClient,
    token: Option<String>,
    path: Option<&str>,
) -> Result<serde_json::Value> {
    match token {
        Some(token) => client.set_access_token(token),
        None => warn!("no access token configured, sending an empty access_token"),
    }
    let result = match path {
        Some(path) => client.get(path).await,
        None => client.get_user().await,
    };
    result.map_err(report).context("API request failed")
}

async fn run(client: &mut MixcloudClient, command: Command, token: Option<String>) -> Result<()> {
    match command {
        Command::AuthorizeUrl => {
            println!("{}", client.authorization_uri());
        }
        Command::Exchange { code } => {
            let token = client
                .access_token(&code)
                .await
                .map_err(report)
                .context("token exchange failed")?;
            println!("{token}");
        }
        Command::Me => {
            let value = fetch_json(client, token, None).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Get { path } => {
            let value = fetch_json(client, token, Some(&path)).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs on stderr so stdout stays clean for command output
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    // Install before any request so the library's counters are captured
    let prometheus_handle = metrics::install_recorder()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let config_path = Config::resolve_path(cli.config.as_deref());
    let mut config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        path = %config_path.display(),
        client_id = %config.client.client_id,
        callback_url = ?config.client.callback_url,
        "configuration loaded"
    );

    let credentials = config
        .credentials()
        .context("client credentials incomplete")?;
    let mut client = MixcloudClient::new(credentials)
        .context("failed to build HTTP client")?
        .with_user_agent(config.client.user_agent.clone());

    let token = resolve_access_token(cli.token.as_deref());
    let outcome = run(&mut client, cli.command, token).await;

    debug!(metrics = %prometheus_handle.render(), "request metrics");
    outcome
}
