//! Runtime settings for the service.

use crate::error::ConfigError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Which [`crate::store::PersonStore`] backend to build at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(format!("expected 'postgres' or 'memory', got '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreBackend,
    /// Required when `store` is Postgres.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Load the demonstration records into the memory store.
    pub seed: bool,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::Postgres,
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            seed: true,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store == StoreBackend::Postgres && self.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
