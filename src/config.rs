// src/config.rs

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;

use crate::blockchain::RetryPolicy;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SERVER_NAME: &str = "Ankr Web3 MCP";

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,
    pub server_name: String,
    /// Serve MCP over stdin/stdout instead of HTTP.
    pub stdio: bool,

    // Ankr settings; endpoint and key are resolved again by `AnkrAuth`
    // when left unset here.
    pub ankr_endpoint: Option<String>,
    pub ankr_api_key: Option<SecretString>,

    // Upstream call bounds
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            port: DEFAULT_PORT,
            server_name: DEFAULT_SERVER_NAME.to_string(),
            stdio: false,
            ankr_endpoint: None,
            ankr_api_key: None,
            timeout: retry.timeout,
            max_retries: retry.max_retries,
            retry_backoff: retry.backoff,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            server_name: non_empty("MCP_SERVER_NAME").unwrap_or(defaults.server_name),
            stdio: lookup("MCP_MODE").is_some(),

            ankr_endpoint: non_empty("ANKR_ENDPOINT"),
            ankr_api_key: non_empty("ANKR_API_KEY")
                .or_else(|| non_empty("ANKR_PRIVATE_KEY"))
                .map(SecretString::new),

            timeout: Duration::from_secs(parse_or(
                &lookup,
                "ANKR_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
            max_retries: parse_or(&lookup, "ANKR_MAX_RETRIES", defaults.max_retries)?,
            retry_backoff: Duration::from_millis(parse_or(
                &lookup,
                "ANKR_RETRY_BACKOFF_MS",
                defaults.retry_backoff.as_millis() as u64,
            )?),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.timeout, self.max_retries, self.retry_backoff)
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got '{}'", name, raw)),
        None => Ok(default),
    }
}
