//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the slotbook API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATA_DIR`: Directory holding one `<id>.json` file per schedule (default: "./data")
//! - `STORE_BACKEND`: `file` or `memory` (default: "file")
//! - `DEFAULT_TIME_ZONE`: Zone given to schedules saved without one (default: "UTC")
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)

use std::{env, path::PathBuf};

use eyre::{Result, WrapErr};
use slotbook_store::StoreBackend;
use tracing::Level;

/// Configuration for the slotbook API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use slotbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Directory the file store writes schedules to
    pub data_dir: PathBuf,

    /// Which data source backs the API
    pub store_backend: StoreBackend,

    /// IANA zone assigned to schedules saved without a `timeZone`
    pub default_time_zone: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("./data"),
            store_backend: StoreBackend::File,
            default_time_zone: "UTC".to_string(),
            log_level: Level::INFO,
            cors_origins: None,
            request_timeout: 30,
        }
    }
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API_PORT value cannot be parsed as a u16
    /// - The STORE_BACKEND value is neither `file` nor `memory`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        // Network settings
        let host = env::var("API_HOST").unwrap_or(defaults.host);
        let port = match env::var("API_PORT") {
            Ok(port) => port.parse::<u16>().wrap_err("Invalid API_PORT value")?,
            Err(_) => defaults.port,
        };

        // Storage settings
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let store_backend = match env::var("STORE_BACKEND") {
            Ok(backend) => backend.parse::<StoreBackend>().wrap_err("Invalid STORE_BACKEND value")?,
            Err(_) => defaults.store_backend,
        };
        let default_time_zone = env::var("DEFAULT_TIME_ZONE")
            .ok()
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or(defaults.default_time_zone);

        // Logging settings
        let log_level = match env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .unwrap_or(defaults.request_timeout);

        Ok(Self {
            host,
            port,
            data_dir,
            store_backend,
            default_time_zone,
            log_level,
            cors_origins,
            request_timeout,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
