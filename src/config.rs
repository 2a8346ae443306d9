//! Configuration loading
//!
//! Loads database connection configuration from environment variables,
//! optionally reading from a .env file first.

use crate::prelude::GormgenError;
use std::{env, path::Path};
use tracing::{debug, error, trace, warn};

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub sslmode: String,
}

impl DbConfig {
    /// Load configuration from environment variables
    ///
    /// Expected variables:
    /// - DB_HOST (default: localhost)
    /// - DB_PORT (default: 5432)
    /// - DB_NAME (required)
    /// - DB_USER (required)
    /// - DB_PASSWORD (required)
    /// - DB_SSLMODE (default: disable)
    pub fn from_env() -> Result<Self, GormgenError> {
        debug!("Loading database configuration from environment");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GormgenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let with_default = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| {
                trace!(key = ?key, "Variable not set, using default");
                default.to_string()
            })
        };

        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                error!(key = ?key, "Required environment variable is not set");
                GormgenError::Config(format!("{} environment variable is required", key))
            })
        };

        let host = with_default("DB_HOST", "localhost");
        let port_str = with_default("DB_PORT", "5432");

        let port = port_str.parse::<u16>().map_err(|e| {
            error!(port = ?port_str, error = ?e, "Invalid DB_PORT value");
            GormgenError::Config("DB_PORT must be a valid port number".to_string())
        })?;

        let database = required("DB_NAME")?;
        let user = required("DB_USER")?;
        let password = required("DB_PASSWORD")?;
        let sslmode = with_default("DB_SSLMODE", "disable");

        debug!(host = ?host, port = ?port, database = ?database, user = ?user, "Configuration loaded");

        Ok(Self {
            host,
            port,
            database,
            user,
            password,
            sslmode,
        })
    }

    /// Load a .env file and then read configuration from environment
    pub fn load(env_file: &Path) -> Result<Self, GormgenError> {
        if env_file.exists() {
            debug!(path = ?env_file, "Loading environment file");
            dotenvy::from_path(env_file).map_err(|e| {
                error!(path = ?env_file, error = ?e, "Failed to load environment file");
                GormgenError::Config(format!("Failed to load {}: {}", env_file.display(), e))
            })?;
        } else {
            warn!(path = ?env_file, "Environment file not found, using existing environment");
        }

        Self::from_env()
    }

    /// Build a PostgreSQL connection string
    pub fn postgres_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={} sslmode={}",
            self.host, self.port, self.database, self.user, self.password, self.sslmode
        )
    }

    /// Build a connection string with password redacted (for logs and error messages)
    pub fn redacted_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password=*** sslmode={}",
            self.host, self.port, self.database, self.user, self.sslmode
        )
    }
}
