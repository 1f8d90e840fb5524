//! Startup configuration, read once from the environment and passed down.

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
const CONNECTIONS_PER_CORE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be set")]
    Missing { key: &'static str },
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection settings handed to [`crate::gateway::connect_pool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Pool size defaults to four connections per core, where the core count
    /// comes from `CPU_CORES` or the detected parallelism.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let url = get("DATABASE_URL").ok_or(ConfigError::Missing {
            key: "DATABASE_URL",
        })?;

        let bind_addr: SocketAddr = match get("BIND_ADDR") {
            Some(raw) => parse("BIND_ADDR", &raw)?,
            None => parse("BIND_ADDR", DEFAULT_BIND_ADDR)?,
        };

        let cores = match get("CPU_CORES") {
            Some(raw) => positive("CPU_CORES", parse::<u32>("CPU_CORES", &raw)?, &raw)?,
            None => u32::try_from(num_cpus::get()).unwrap_or(u32::MAX).max(1),
        };
        let pool_size = match get("DB_POOL_SIZE") {
            Some(raw) => positive("DB_POOL_SIZE", parse::<u32>("DB_POOL_SIZE", &raw)?, &raw)?,
            None => cores.saturating_mul(CONNECTIONS_PER_CORE),
        };

        let acquire_timeout_secs = get("DB_ACQUIRE_TIMEOUT_SECS")
            .map(|raw| parse::<u64>("DB_ACQUIRE_TIMEOUT_SECS", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS);

        let run_migrations = get("RUN_MIGRATIONS")
            .map(|raw| parse_bool("RUN_MIGRATIONS", &raw))
            .transpose()?
            .unwrap_or(true);

        Ok(Self {
            bind_addr,
            database: DatabaseConfig {
                url,
                pool_size,
                acquire_timeout_secs,
            },
            run_migrations,
        })
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_owned(),
        reason: err.to_string(),
    })
}

fn positive(key: &'static str, value: u32, raw: &str) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: raw.to_owned(),
            reason: "must be at least 1".to_owned(),
        });
    }
    Ok(value)
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_owned(),
            reason: "expected a boolean".to_owned(),
        }),
    }
}
