use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::gopher::{ClientSettings, DEFAULT_BASE_URL};
use crate::paginator::DEFAULT_REQUEST_DELAY;
use crate::sanitize::DEFAULT_DATA_DIR;

pub const DEFAULT_QUERY: &str = "bitcoin min_faves:1000";
pub const DEFAULT_AMOUNT: usize = 10_000;
pub const DEFAULT_TREND_MIN_FAVES: u32 = 100;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("GOPHER_CLIENT_TOKEN is not set. Please set it in your environment or .env file")]
    MissingToken,

    #[error("invalid {key} value: {value:?} (must be a number)")]
    NotANumber { key: &'static str, value: String },

    #[error("{key} must be greater than 0, got: {value}")]
    NotPositive { key: &'static str, value: String },

    #[error("invalid {key} value: {value:?} (expected e.g. 30, 30s or 500ms)")]
    InvalidDuration { key: &'static str, value: String },
}

/// Values given on the command line. A set field wins over the environment,
/// and the matching variable is never read.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub query: Option<String>,
    pub amount: Option<usize>,
    pub data_dir: Option<PathBuf>,
    pub trend_min_faves: Option<u32>,
}

/// Everything a run needs, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
    pub query: String,
    pub amount: usize,
    pub data_dir: PathBuf,
    pub request_delay: Duration,
    pub trend_min_faves: u32,
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
        dotenv().ok();
        Config::from_lookup_with(|key| env::var(key).ok(), overrides)
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Config::from_lookup_with(lookup, &ConfigOverrides::default())
    }

    pub fn from_lookup_with<F>(lookup: F, overrides: &ConfigOverrides) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("GOPHER_CLIENT_TOKEN").ok_or(ConfigError::MissingToken)?;

        let query = match &overrides.query {
            Some(query) => query.clone(),
            None => get_or_default(&get, "QUERY", DEFAULT_QUERY),
        };
        let amount = match (overrides.amount, get("AMOUNT")) {
            (Some(amount), _) => amount,
            (None, Some(raw)) => parse_amount_for("AMOUNT", &raw)?,
            (None, None) => {
                tracing::info!(default = DEFAULT_AMOUNT, "AMOUNT not set, using default");
                DEFAULT_AMOUNT
            }
        };
        let trend_min_faves = match (overrides.trend_min_faves, get("TREND_MIN_FAVES")) {
            (Some(min_faves), _) => min_faves,
            (None, Some(raw)) => raw.trim().parse::<u32>().map_err(|_| ConfigError::NotANumber {
                key: "TREND_MIN_FAVES",
                value: raw,
            })?,
            (None, None) => DEFAULT_TREND_MIN_FAVES,
        };
        let data_dir = match &overrides.data_dir {
            Some(dir) => dir.clone(),
            None => PathBuf::from(get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
        };

        Ok(Config {
            token: token.trim().to_string(),
            base_url: get("GOPHER_CLIENT_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: get_duration(&get, "GOPHER_CLIENT_TIMEOUT", DEFAULT_TIMEOUT)?,
            query,
            amount,
            data_dir,
            request_delay: get_duration(&get, "REQUEST_DELAY", DEFAULT_REQUEST_DELAY)?,
            trend_min_faves,
            poll_interval: get_duration(&get, "JOB_POLL_INTERVAL", DEFAULT_POLL_INTERVAL)?,
            max_wait: get_duration(&get, "JOB_MAX_WAIT", DEFAULT_MAX_WAIT)?,
        })
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            token: self.token.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            poll_interval: self.poll_interval,
            max_wait: self.max_wait,
        }
    }
}

fn get_or_default<G>(get: &G, key: &str, default: &str) -> String
where
    G: Fn(&str) -> Option<String>,
{
    get(key).unwrap_or_else(|| {
        tracing::info!(key, default, "not set, using default");
        default.to_string()
    })
}

fn get_duration<G>(get: &G, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_duration(&raw).ok_or(ConfigError::InvalidDuration { key, value: raw }),
        None => Ok(default),
    }
}

/// Target counts must be positive integers.
pub fn parse_amount(raw: &str) -> Result<usize, ConfigError> {
    parse_amount_for("AMOUNT", raw)
}

fn parse_amount_for(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    let value: i64 = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
        key,
        value: raw.to_string(),
    })?;
    if value <= 0 {
        return Err(ConfigError::NotPositive {
            key,
            value: value.to_string(),
        });
    }
    usize::try_from(value).map_err(|_| ConfigError::NotANumber {
        key,
        value: raw.to_string(),
    })
}

/// Accepts `30`, `30s` or `500ms`. Bare numbers are seconds.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if let Some(ms) = raw.strip_suffix("ms") {
        return ms.trim().parse::<u64>().ok().map(Duration::from_millis);
    }
    let secs = raw.strip_suffix('s').unwrap_or(raw);
    secs.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("GOPHER_CLIENT_TOKEN", "tok")])).unwrap();
        assert_eq!(config.token, "tok");
        assert_eq!(config.query, DEFAULT_QUERY);
        assert_eq!(config.amount, DEFAULT_AMOUNT);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.request_delay, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.trend_min_faves, 100);
    }

    #[test]
    fn test_missing_or_blank_token() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingToken
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("GOPHER_CLIENT_TOKEN", "  ")])).unwrap_err(),
            ConfigError::MissingToken
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("GOPHER_CLIENT_TOKEN", "tok"),
            ("QUERY", "rust lang"),
            ("AMOUNT", "250"),
            ("GOPHER_CLIENT_URL", "http://localhost:8080/api"),
            ("GOPHER_CLIENT_TIMEOUT", "15s"),
            ("REQUEST_DELAY", "250ms"),
            ("DATA_DIR", "out"),
        ]))
        .unwrap();
        assert_eq!(config.query, "rust lang");
        assert_eq!(config.amount, 250);
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.request_delay, Duration::from_millis(250));
        assert_eq!(config.data_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_bad_amounts() {
        let err = Config::from_lookup(lookup(&[("GOPHER_CLIENT_TOKEN", "t"), ("AMOUNT", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { key: "AMOUNT", .. }));

        let err = Config::from_lookup(lookup(&[("GOPHER_CLIENT_TOKEN", "t"), ("AMOUNT", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { key: "AMOUNT", .. }));

        assert!(parse_amount("-5").is_err());
        assert_eq!(parse_amount(" 42 "), Ok(42));
    }

    #[test]
    fn test_cli_amount_skips_malformed_env() {
        let env = lookup(&[
            ("GOPHER_CLIENT_TOKEN", "t"),
            ("AMOUNT", "lots"),
            ("TREND_MIN_FAVES", "many"),
            ("QUERY", "from env"),
        ]);
        let overrides = ConfigOverrides {
            query: Some("from cli".to_string()),
            amount: Some(5),
            data_dir: Some(PathBuf::from("cli-data")),
            trend_min_faves: Some(7),
        };

        let config = Config::from_lookup_with(env, &overrides).unwrap();
        assert_eq!(config.amount, 5);
        assert_eq!(config.trend_min_faves, 7);
        assert_eq!(config.query, "from cli");
        assert_eq!(config.data_dir, PathBuf::from("cli-data"));
    }

    #[test]
    fn test_malformed_env_amount_without_override() {
        let err = Config::from_lookup_with(
            lookup(&[("GOPHER_CLIENT_TOKEN", "t"), ("AMOUNT", "lots")]),
            &ConfigOverrides {
                query: Some("q".to_string()),
                ..ConfigOverrides::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { key: "AMOUNT", .. }));
    }

    #[test]
    fn test_bad_duration() {
        let err = Config::from_lookup(lookup(&[
            ("GOPHER_CLIENT_TOKEN", "t"),
            ("GOPHER_CLIENT_TIMEOUT", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { .. }));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("0"), Some(Duration::ZERO));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("1.5s"), None);
    }
}
