use eyre::{eyre, Result};
use reqwest::Url;
use std::time::Duration;

/// `value_parser` to parse a `str` to `Url`.
pub fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value).map_err(Into::into)
}

/// `value_parser` to parse a number of seconds to `Duration`, zero is not allowed.
pub fn parse_duration_secs(value: &str) -> Result<Duration> {
    match value.parse::<u64>()? {
        0 => Err(eyre!("timeout must be positive")),
        secs => Ok(Duration::from_secs(secs)),
    }
}
