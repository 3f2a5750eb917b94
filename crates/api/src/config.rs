//! # API Configuration Module
//!
//! Loads the HTTP server's settings from environment variables, falling back
//! to defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string. When unset the in-memory
//!   backend is used.
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `API_SESSION_TTL_SECONDS`: Lifetime of a login token (default: 86400)
//! - `BOOKING_LOCK_TIMEOUT_MS`: How long a booking may wait for a slot's lock
//!   (default: 5000)

use std::env;
use std::time::Duration;

use eyre::{Result, WrapErr};
use gymbook_db::DEFAULT_LOCK_TIMEOUT;
use tracing::Level;

use crate::middleware::auth::DEFAULT_SESSION_TTL;

/// Configuration for the GymBook HTTP server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use gymbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL connection string, if any
    pub database_url: Option<String>,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// How long a login token stays valid
    pub session_ttl: Duration,

    /// Upper bound on waiting for a slot's lock during a booking
    pub lock_timeout: Duration,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API_PORT value cannot be parsed as a u16
    /// - The BOOKING_LOCK_TIMEOUT_MS value is not a whole number of milliseconds
    /// - The API_SESSION_TTL_SECONDS value is not a whole number of seconds
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_default());

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let session_ttl = match env::var("API_SESSION_TTL_SECONDS") {
            Ok(secs) => Duration::from_secs(
                secs.parse()
                    .wrap_err("Invalid API_SESSION_TTL_SECONDS value")?,
            ),
            Err(_) => DEFAULT_SESSION_TTL,
        };

        let lock_timeout = match env::var("BOOKING_LOCK_TIMEOUT_MS") {
            Ok(ms) => Duration::from_millis(
                ms.parse()
                    .wrap_err("Invalid BOOKING_LOCK_TIMEOUT_MS value")?,
            ),
            Err(_) => DEFAULT_LOCK_TIMEOUT,
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            session_ttl,
            lock_timeout,
        })
    }

    /// Returns the server address as a string, e.g. "127.0.0.1:3000"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Maps a `LOG_LEVEL` value to a tracing level; anything unrecognised is
/// treated as `info`.
pub fn parse_log_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
