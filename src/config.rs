use std::{env, net::SocketAddr, str::FromStr};

use chrono::Duration;
use url::Url;

use crate::error::Error;

pub const DEFAULT_HOURS_URL: &str = "https://studentaffairs.duke.edu/forms/dining/menus-hours/";
const DEFAULT_REFRESH_MINUTES: i64 = 15;

/// Settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub hours_url: Url,
    /// When set, platform verification requests must echo this token.
    pub verify_token: Option<String>,
    pub refresh_interval: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let addr = SocketAddr::from_str(&format!("{host}:{port}"))
            .map_err(|e| Error::Config(format!("`{host}:{port}` is not a socket address: {e}")))?;

        let hours_url = lookup("HOURS_URL").unwrap_or_else(|| DEFAULT_HOURS_URL.to_string());
        let hours_url = Url::parse(&hours_url)
            .map_err(|e| Error::Config(format!("HOURS_URL `{hours_url}` is invalid: {e}")))?;

        let refresh_interval = match lookup("REFRESH_MINUTES") {
            Some(minutes) => minutes
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .and_then(Duration::try_minutes)
                .ok_or_else(|| {
                    Error::Config(format!(
                        "REFRESH_MINUTES should be a positive number of minutes, got `{minutes}`"
                    ))
                })?,
            None => Duration::minutes(DEFAULT_REFRESH_MINUTES),
        };

        Ok(Self {
            addr,
            hours_url,
            verify_token: lookup("VERIFY_TOKEN").filter(|t| !t.is_empty()),
            refresh_interval,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            hours_url: Url::parse(DEFAULT_HOURS_URL).expect("default hours url should be valid"),
            verify_token: None,
            refresh_interval: Duration::minutes(DEFAULT_REFRESH_MINUTES),
        }
    }
}
