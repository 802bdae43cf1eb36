use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use clap::Parser;

use crate::domain::notification::{CardStyle, DEFAULT_CARD_THEME, DEFAULT_CARD_THUMBNAIL};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "issue-relay",
    version,
    about = "Relays Jira webhook events to a Zoho Cliq channel"
)]
pub struct Args {
    #[arg(long, env = "ISSUE_RELAY_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    #[arg(long, env = "ISSUE_RELAY_PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "LAMBDA_CRED", hide_env_values = true)]
    pub shared_secret: Option<String>,

    #[arg(long, env = "ZOHO_CLIQ_API_TOKEN", hide_env_values = true)]
    pub cliq_api_token: Option<String>,

    #[arg(long, env = "CHANNEL_ENDPOINT")]
    pub channel_endpoint: Option<String>,

    #[arg(long, env = "JIRA_URL")]
    pub jira_url: Option<String>,

    #[arg(long, env = "ISSUE_RELAY_CARD_THEME", default_value = DEFAULT_CARD_THEME)]
    pub card_theme: String,

    #[arg(long, env = "ISSUE_RELAY_CARD_THUMBNAIL", default_value = DEFAULT_CARD_THUMBNAIL)]
    pub card_thumbnail: String,

    #[arg(long, env = "ISSUE_RELAY_DISPATCH_TIMEOUT_MS", default_value_t = 5_000)]
    pub dispatch_timeout_ms: u64,

    #[arg(long, env = "ISSUE_RELAY_MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,

    #[arg(long, env = "ISSUE_RELAY_JSON_LOGS", default_value_t = false)]
    pub json_logs: bool,
}

#[derive(Clone)]
pub struct RuntimeConfig {
    pub host: IpAddr,
    pub port: u16,
    pub shared_secret: String,
    pub cliq_api_token: String,
    pub channel_endpoint: String,
    pub jira_url: String,
    pub card_style: CardStyle,
    pub dispatch_timeout: Duration,
    pub max_body_bytes: usize,
    pub runtime_version: String,
    pub log_filter: String,
    pub json_logs: bool,
}

impl RuntimeConfig {
    /// Validates parsed arguments. The first missing required value is
    /// returned by its environment variable name.
    pub fn from_args(args: Args) -> Result<Self, String> {
        let shared_secret = require(args.shared_secret, "LAMBDA_CRED")?;
        let cliq_api_token = require(args.cliq_api_token, "ZOHO_CLIQ_API_TOKEN")?;
        let channel_endpoint = require(args.channel_endpoint, "CHANNEL_ENDPOINT")?;
        let jira_url = require(args.jira_url, "JIRA_URL")?;

        if args.port == 0 {
            return Err("port must be greater than 0".to_owned());
        }
        if args.dispatch_timeout_ms == 0 {
            return Err("dispatch_timeout_ms must be greater than 0".to_owned());
        }
        if args.max_body_bytes == 0 {
            return Err("max_body_bytes must be greater than 0".to_owned());
        }

        Ok(Self {
            host: args.host,
            port: args.port,
            shared_secret,
            cliq_api_token,
            channel_endpoint,
            jira_url,
            card_style: CardStyle {
                theme: args.card_theme,
                thumbnail: args.card_thumbnail,
            },
            dispatch_timeout: Duration::from_millis(args.dispatch_timeout_ms),
            max_body_bytes: args.max_body_bytes,
            runtime_version: env!("CARGO_PKG_VERSION").to_owned(),
            log_filter: args.log_filter,
            json_logs: args.json_logs,
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[must_use]
    pub fn for_test(host: IpAddr, port: u16, channel_endpoint: String) -> Self {
        Self {
            host,
            port,
            shared_secret: "test-secret".to_owned(),
            cliq_api_token: "test-token".to_owned(),
            channel_endpoint,
            jira_url: "https://jira.example.test".to_owned(),
            card_style: CardStyle::default(),
            dispatch_timeout: Duration::from_millis(2_000),
            max_body_bytes: 64 * 1024,
            runtime_version: "test".to_owned(),
            log_filter: "warn".to_owned(),
            json_logs: false,
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("shared_secret", &"<redacted>")
            .field("cliq_api_token", &"<redacted>")
            .field("channel_endpoint", &self.channel_endpoint)
            .field("jira_url", &self.jira_url)
            .field("card_style", &self.card_style)
            .field("dispatch_timeout", &self.dispatch_timeout)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("runtime_version", &self.runtime_version)
            .field("log_filter", &self.log_filter)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

fn require(input: Option<String>, name: &str) -> Result<String, String> {
    input
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| format!("{name} must be set"))
}
