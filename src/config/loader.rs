//! Load [`AppConfig`] from environment variables.

use super::types::AppConfig;
use crate::error::ConfigError;
use std::str::FromStr;

pub const ENV_STORE: &str = "PESSOAS_STORE";
pub const ENV_SEED: &str = "PESSOAS_SEED";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_PORT: &str = "PORT";
pub const ENV_BODY_LIMIT: &str = "BODY_LIMIT_BYTES";

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        if let Some(v) = lookup(ENV_STORE) {
            config.store = parse(ENV_STORE, &v)?;
        }
        config.database_url = lookup(ENV_DATABASE_URL).filter(|v| !v.trim().is_empty());
        if let Some(v) = lookup(ENV_MAX_CONNECTIONS) {
            config.max_connections = parse(ENV_MAX_CONNECTIONS, &v)?;
        }
        if let Some(v) = lookup(ENV_SEED) {
            config.seed = parse_bool(ENV_SEED, &v)?;
        }
        if let Some(v) = lookup(ENV_BIND_ADDR) {
            config.bind_addr = parse(ENV_BIND_ADDR, &v)?;
        }
        if let Some(v) = lookup(ENV_PORT) {
            config.port = parse(ENV_PORT, &v)?;
        }
        if let Some(v) = lookup(ENV_BODY_LIMIT) {
            config.body_limit = parse(ENV_BODY_LIMIT, &v)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected a boolean".into(),
        }),
    }
}
