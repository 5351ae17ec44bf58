//! Process settings read from the environment (`.env` is loaded by the binary).

use crate::error::ConfigError;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Prefix every resource router is nested under, e.g. `/api/v1`.
    pub api_prefix: String,
    pub db_max_connections: u32,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "postgres://localhost/summit".into(),
            host: "0.0.0.0".into(),
            port: 3000,
            api_prefix: "/api/v1".into(),
            db_max_connections: 5,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Settings::default();
        let api_prefix = lookup("API_PREFIX").unwrap_or(d.api_prefix);
        if !api_prefix.starts_with('/') {
            return Err(ConfigError::Env(format!("API_PREFIX must start with '/': {}", api_prefix)));
        }
        Ok(Settings {
            database_url: lookup("DATABASE_URL").unwrap_or(d.database_url),
            host: lookup("HOST").unwrap_or(d.host),
            port: parsed(&lookup, "PORT", d.port)?,
            api_prefix: api_prefix.trim_end_matches('/').to_string(),
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", d.db_max_connections)?,
            body_limit_bytes: parsed(&lookup, "BODY_LIMIT_BYTES", d.body_limit_bytes)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Env(format!("{} is not a valid number: {}", key, raw))),
    }
}
