use std::env;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://campus.db?mode=rwc";
pub const DEFAULT_LOG_FILTER: &str = "campus=debug,tower_http=debug";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads settings from the process environment, falling back to defaults
    /// for unset keys. Call `dotenvy::dotenv()` first to honour a `.env` file.
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let log_filter = lookup("RUST_LOG").unwrap_or(defaults.log_filter);
        let max_connections = parse_or("DB_MAX_CONNECTIONS", &lookup, defaults.max_connections)?;
        let host = parse_or("HOST", &lookup, defaults.host)?;
        let port = parse_or("PORT", &lookup, defaults.port)?;

        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        if port == 0 {
            return Err(ConfigError::Invalid {
                key: "PORT",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            log_filter,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
