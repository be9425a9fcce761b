use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/api";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BLOCK_COUNT: u64 = 100;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Etherscan credential. Not checked here; a bad key only shows up as
    /// provider errors once blocks are fetched.
    pub api_key: String,
    pub api_url: String,
    /// When set, blocks are read from this JSON-RPC node instead of Etherscan.
    pub rpc_url: Option<String>,
    pub port: u16,
    pub block_count: u64,
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            api_url: DEFAULT_ETHERSCAN_API_URL.to_string(),
            rpc_url: None,
            port: DEFAULT_PORT,
            block_count: DEFAULT_BLOCK_COUNT,
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }
}

impl Config {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("API_PORT") {
            Some(value) => parse_number::<u16>("API_PORT", value, "a port number")?,
            None => defaults.port,
        };

        let block_count = match lookup("BLOCK_COUNT") {
            Some(value) => {
                let count = parse_number::<u64>("BLOCK_COUNT", value.clone(), "a positive integer")?;
                if count == 0 {
                    return Err(ConfigError::Invalid {
                        key: "BLOCK_COUNT",
                        value,
                        expected: "a positive integer",
                    });
                }
                count
            }
            None => defaults.block_count,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                match parse_number::<u64>("REQUEST_TIMEOUT_SECS", value, "a number of seconds")? {
                    0 => None,
                    secs => Some(Duration::from_secs(secs)),
                }
            }
            None => defaults.request_timeout,
        };

        Ok(Config {
            api_key: lookup("API_KEY").unwrap_or(defaults.api_key),
            api_url: lookup("ETHERSCAN_API_URL").unwrap_or(defaults.api_url),
            rpc_url: lookup("RPC_URL").filter(|url| !url.trim().is_empty()),
            port,
            block_count,
            request_timeout,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid {
            key,
            value,
            expected,
        })
}
