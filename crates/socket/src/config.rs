use std::env;
use std::time::Duration;

use eyre::{Result, WrapErr};
use gymbook_db::DEFAULT_LOCK_TIMEOUT;

/// Configuration for the line-protocol server.
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// Address to bind (defaults to "127.0.0.1")
    pub host: String,
    /// Port to listen on (defaults to 8888)
    pub port: u16,
    /// Database connection URL; the in-memory backend is used without one
    pub database_url: Option<String>,
    /// Upper bound on waiting for a slot's lock during a booking
    pub lock_timeout: Duration,
}

impl SocketConfig {
    /// Load configuration from `SOCKET_HOST`, `SOCKET_PORT`, `DATABASE_URL`
    /// and `BOOKING_LOCK_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        let host = env::var("SOCKET_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("SOCKET_PORT")
            .unwrap_or_else(|_| "8888".to_string())
            .parse::<u16>()
            .wrap_err("SOCKET_PORT must be a valid port number")?;

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let lock_timeout = match env::var("BOOKING_LOCK_TIMEOUT_MS") {
            Ok(ms) => Duration::from_millis(
                ms.parse()
                    .wrap_err("BOOKING_LOCK_TIMEOUT_MS must be a whole number of milliseconds")?,
            ),
            Err(_) => DEFAULT_LOCK_TIMEOUT,
        };

        Ok(Self {
            host,
            port,
            database_url,
            lock_timeout,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
