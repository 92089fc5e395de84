//! Process configuration read from the environment (and an optional `.env`).

use std::net::SocketAddr;
use std::time::Duration;

use interfaces_github_repos::DEFAULT_API_URL;
use thiserror::Error;
use utils_trace::{ParseTraceFormatError, TraceFormat};

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const DATABASE_POOL_SIZE: &str = "DATABASE_POOL_SIZE";
pub const DATABASE_QUERY_TIMEOUT_MS: &str = "DATABASE_QUERY_TIMEOUT_MS";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be set")]
    Missing { key: &'static str },

    #[error("{key}: invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("LoadDotenv: {source}")]
    LoadDotenv {
        #[from]
        source: dotenvy::Error,
    },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Empty when unset; upstream calls then go out unauthenticated.
    pub github_token: String,
    pub github_api_url: String,
    pub bind_addr: SocketAddr,
    pub pool_size: u32,
    pub query_timeout: Duration,
    pub log_level: String,
    pub log_format: TraceFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"<redacted>")
            .field("github_token_set", &!self.github_token.is_empty())
            .field("github_api_url", &self.github_api_url)
            .field("bind_addr", &self.bind_addr)
            .field("pool_size", &self.pool_size)
            .field("query_timeout", &self.query_timeout)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// Loads `.env` into the process environment when the file exists.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(source) => Err(ConfigError::LoadDotenv { source }),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get(DATABASE_URL).ok_or(ConfigError::Missing { key: DATABASE_URL })?;
        let github_token = get(GITHUB_TOKEN).unwrap_or_default();
        let github_api_url = get(GITHUB_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let bind_addr: SocketAddr = parse(BIND_ADDR, get(BIND_ADDR), DEFAULT_BIND_ADDR.parse())?;
        let pool_size: u32 = parse(DATABASE_POOL_SIZE, get(DATABASE_POOL_SIZE), Ok(DEFAULT_POOL_SIZE))?;
        let query_timeout_ms: u64 = parse(
            DATABASE_QUERY_TIMEOUT_MS,
            get(DATABASE_QUERY_TIMEOUT_MS),
            Ok(DEFAULT_QUERY_TIMEOUT_MS),
        )?;
        let log_level = get(LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());
        let log_format = parse::<TraceFormat, ParseTraceFormatError>(
            LOG_FORMAT,
            get(LOG_FORMAT),
            Ok(TraceFormat::default()),
        )?;

        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: DATABASE_POOL_SIZE,
                value: pool_size.to_string(),
                reason: "must be at least 1".to_owned(),
            });
        }
        if query_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: DATABASE_QUERY_TIMEOUT_MS,
                value: query_timeout_ms.to_string(),
                reason: "must be at least 1".to_owned(),
            });
        }

        Ok(Self {
            database_url,
            github_token,
            github_api_url,
            bind_addr,
            pool_size,
            query_timeout: Duration::from_millis(query_timeout_ms),
            log_level,
            log_format,
        })
    }
}

fn parse<T, E>(
    key: &'static str,
    raw: Option<String>,
    default: Result<T, E>,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = E>,
    E: std::fmt::Display,
{
    let (value, parsed) = match raw {
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            (value, parsed)
        }
        None => (String::from("<default>"), default),
    };
    parsed.map_err(|err| ConfigError::Invalid {
        key,
        value,
        reason: err.to_string(),
    })
}
