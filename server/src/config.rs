use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use chrono::Duration;
use potluck_core::MAX_FILE_SIZE;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Prefix of public image URLs, without a trailing slash.
    pub public_base_url: String,
    pub session_ttl: Duration,
    pub max_image_bytes: usize,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let session_ttl_days: i64 = try_load("SESSION_TTL_DAYS", "30")?;

        Ok(Self {
            database_url,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:3000")?,
            public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            session_ttl: Duration::days(session_ttl_days),
            max_image_bytes: try_load("MAX_IMAGE_BYTES", &MAX_FILE_SIZE.to_string())?,
        })
    }

    /// Settings for in-process use without a database.
    #[cfg(test)]
    pub fn local() -> Self {
        Self {
            database_url: String::new(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            public_base_url: "http://localhost:3000".to_string(),
            session_ttl: Duration::days(30),
            max_image_bytes: MAX_FILE_SIZE,
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        debug!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = var_or(key, default);
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("Invalid {key} value: {e}");
            Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_uses_default() {
        let port: u16 = try_load("POTLUCK_TEST_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_try_load_reports_bad_value() {
        let err = try_load::<u16>("POTLUCK_TEST_UNSET_PORT", "not-a-port").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "POTLUCK_TEST_UNSET_PORT", .. }));
    }
}
