//! Redis backend configuration.

use std::time::Duration;

use voucher_core::defaults;

/// Configuration for the Redis voucher backend.
#[derive(Clone)]
pub struct RedisConfig {
    /// Redis connection URL.
    ///
    /// Examples:
    /// - `redis://127.0.0.1:6379/0`
    /// - `redis://:password@host:6379/1`
    /// - `rediss://host:6380` (TLS)
    pub redis_url: String,

    /// Timeout for establishing a connection.
    pub connection_timeout: Duration,

    /// Timeout for a single command or script response.
    pub response_timeout: Duration,

    /// Reconnect attempts made by the connection manager.
    pub number_of_retries: usize,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            redis_url: defaults::DEFAULT_REDIS_URL.to_string(),
            connection_timeout: Duration::from_millis(defaults::DEFAULT_CONNECTION_TIMEOUT_MS),
            response_timeout: Duration::from_millis(defaults::DEFAULT_RESPONSE_TIMEOUT_MS),
            number_of_retries: defaults::DEFAULT_NUMBER_OF_RETRIES,
        }
    }
}

impl RedisConfig {
    /// Create a new config with just the Redis URL.
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            ..Default::default()
        }
    }

    /// Builder: set connection timeout.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Builder: set response timeout.
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Builder: set reconnect attempts.
    pub fn number_of_retries(mut self, n: usize) -> Self {
        self.number_of_retries = n;
        self
    }
}

// The URL may carry a password.
impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("connection_timeout", &self.connection_timeout)
            .field("response_timeout", &self.response_timeout)
            .field("number_of_retries", &self.number_of_retries)
            .finish_non_exhaustive()
    }
}
