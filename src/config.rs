use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

pub const DEFAULT_PAGE_URL: &str = "https://topg.org/cs-servers/server-676666";

/// Runtime configuration, read from the environment once at startup.
/// A `.env` file is honored in development via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset disables Discord delivery entirely; everything else still runs.
    pub discord_webhook_url: Option<String>,
    pub page_url: String,
    /// Shown as the "vote again" link in embeds; defaults to the page URL.
    pub vote_link: String,
    pub port: u16,
    pub poll_interval: Duration,
    pub status_interval: Duration,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let discord_webhook_url = env::var("DISCORD_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.is_empty());
        if discord_webhook_url.is_none() {
            warn!("DISCORD_WEBHOOK_URL is not set; Discord notifications are disabled");
        }

        let page_url = env::var("TOPG_PAGE_URL").unwrap_or_else(|_| DEFAULT_PAGE_URL.to_string());
        let vote_link = env::var("VOTE_LINK").unwrap_or_else(|_| page_url.clone());

        Self {
            discord_webhook_url,
            page_url,
            vote_link,
            port: parse_or("PORT", 3000),
            poll_interval: Duration::from_secs(parse_or("POLL_INTERVAL_SECS", 300_u64).max(1)),
            status_interval: Duration::from_secs(parse_or("STATUS_INTERVAL_SECS", 900_u64).max(1)),
            fetch_timeout: Duration::from_secs(parse_or("FETCH_TIMEOUT_SECS", 30_u64).max(1)),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} value {:?}; using the default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
