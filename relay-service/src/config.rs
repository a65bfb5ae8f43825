//! Startup configuration read from the process environment.
//!
//! The relay reads its settings exactly once, before binding, and hands the
//! resulting [`Config`] to the brokerage client and the router state.

use std::{env, fmt, net::SocketAddr, time::Duration};

use thiserror::Error;

pub const PAPER_BASE_URL: &str = "https://paper-api.alpaca.markets";
pub const LIVE_BASE_URL: &str = "https://api.alpaca.markets";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BROKER_TIMEOUT_SECS: u64 = 10;

pub const API_KEY_VAR: &str = "ALPACA_API_KEY";
pub const SECRET_KEY_VAR: &str = "ALPACA_SECRET_KEY";
pub const ENVIRONMENT_VAR: &str = "ALPACA_ENV";
pub const BASE_URL_VAR: &str = "ALPACA_BASE_URL";
pub const BIND_ADDR_VAR: &str = "RELAY_BIND_ADDR";
pub const BROKER_TIMEOUT_VAR: &str = "RELAY_BROKER_TIMEOUT_SECS";

/// Brokerage account type. Paper is the default so a misconfigured
/// deployment never trades real money.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Paper,
    Live,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Paper => PAPER_BASE_URL,
            Environment::Live => LIVE_BASE_URL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Paper => "paper",
            Environment::Live => "live",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub secret_key: String,
    pub environment: Environment,
    /// Brokerage REST root, without trailing slash.
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub broker_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;
        let secret_key = get(SECRET_KEY_VAR).ok_or(ConfigError::Missing(SECRET_KEY_VAR))?;

        let environment = match get(ENVIRONMENT_VAR) {
            None => Environment::Paper,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "paper" => Environment::Paper,
                "live" => Environment::Live,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: ENVIRONMENT_VAR,
                        value: raw,
                        reason: "expected \"paper\" or \"live\"".to_string(),
                    })
                }
            },
        };

        let base_url = get(BASE_URL_VAR)
            .unwrap_or_else(|| environment.base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        let raw_addr = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: BIND_ADDR_VAR,
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        let broker_timeout = match get(BROKER_TIMEOUT_VAR) {
            None => Duration::from_secs(DEFAULT_BROKER_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: BROKER_TIMEOUT_VAR,
                        value: raw,
                        reason: "expected a positive number of seconds".to_string(),
                    })
                }
            },
        };

        Ok(Self {
            api_key,
            secret_key,
            environment,
            base_url,
            bind_addr,
            broker_timeout,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("bind_addr", &self.bind_addr)
            .field("broker_timeout", &self.broker_timeout)
            .finish()
    }
}
