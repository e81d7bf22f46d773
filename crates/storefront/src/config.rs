//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::env;
use std::net::{IpAddr, Ipv4Addr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = SecretString::from(require("STOREFRONT_DATABASE_URL")?);

        let host = match optional("STOREFRONT_HOST") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".into(), e.to_string()))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match optional("STOREFRONT_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_PORT".into(), e.to_string()))?,
            None => 3000,
        };

        let sentry_dsn = optional("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            sentry_dsn,
        })
    }
}

/// Read a required environment variable.
fn require(name: &str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_owned()))
}

/// Read an optional environment variable, treating empty values as unset.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
// set_var is unsafe since Rust 2024; fine in a single-threaded test.
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn from_env_applies_defaults_and_reads_required_values() {
        // Single test mutating the environment; keep it that way to avoid
        // races between parallel tests.
        unsafe {
            env::set_var("STOREFRONT_DATABASE_URL", "postgres://localhost/copperleaf");
            env::remove_var("STOREFRONT_HOST");
            env::remove_var("STOREFRONT_PORT");
            env::remove_var("SENTRY_DSN");
        }

        let config = StorefrontConfig::from_env().expect("config should load");
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());

        unsafe {
            env::set_var("STOREFRONT_HOST", "0.0.0.0");
            env::set_var("STOREFRONT_PORT", "8080");
        }
        let config = StorefrontConfig::from_env().expect("config should load");
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert_eq!(config.port, 8080);

        unsafe {
            env::set_var("STOREFRONT_PORT", "not-a-port");
        }
        assert!(matches!(
            StorefrontConfig::from_env(),
            Err(ConfigError::InvalidEnvVar(name, _)) if name == "STOREFRONT_PORT"
        ));

        unsafe {
            env::remove_var("STOREFRONT_PORT");
            env::remove_var("STOREFRONT_DATABASE_URL");
        }
        assert!(matches!(
            StorefrontConfig::from_env(),
            Err(ConfigError::MissingEnvVar(name)) if name == "STOREFRONT_DATABASE_URL"
        ));
    }
}
