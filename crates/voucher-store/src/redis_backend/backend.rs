//! Redis voucher backend.

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, RedisError, Script};
use tracing::debug;

use crate::error::VoucherError;
use crate::record::Fields;
use crate::traits::VoucherBackend;

use super::config::RedisConfig;
use super::script::REDEEM_SCRIPT;

/// Map a client error to a voucher error.
///
/// Connection and timeout failures become [`VoucherError::Unavailable`];
/// everything else is reported through `other`.
fn classify(err: RedisError, other: fn(RedisError) -> VoucherError) -> VoucherError {
    if err.is_timeout()
        || err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
    {
        VoucherError::unavailable(err)
    } else {
        other(err)
    }
}

fn command_error(err: RedisError) -> VoucherError {
    classify(err, VoucherError::backend)
}

fn script_error(err: RedisError) -> VoucherError {
    classify(err, VoucherError::script)
}

/// Redis-backed voucher storage.
///
/// Holds a multiplexed [`ConnectionManager`] that reconnects on failure.
/// The handle is cloned per call, so one backend can serve any number of
/// concurrent tasks.
pub struct RedisBackend {
    conn: ConnectionManager,
    script: Script,
    config: RedisConfig,
}

impl RedisBackend {
    /// Connect to Redis and load the redemption script.
    pub async fn connect(config: RedisConfig) -> Result<Self, VoucherError> {
        let client = Client::open(config.redis_url.as_str()).map_err(VoucherError::backend)?;

        let manager_config = ConnectionManagerConfig::new()
            .set_number_of_retries(config.number_of_retries)
            .set_connection_timeout(config.connection_timeout)
            .set_response_timeout(config.response_timeout);

        let conn = client
            .get_connection_manager_with_config(manager_config)
            .await
            .map_err(command_error)?;

        let backend = Self {
            conn,
            script: Script::new(REDEEM_SCRIPT),
            config,
        };
        backend.load_script().await?;
        Ok(backend)
    }

    /// Load the redemption script into the server's script cache.
    ///
    /// Invocations fall back to `EVAL` if the cache is flushed later.
    pub async fn load_script(&self) -> Result<(), VoucherError> {
        let mut conn = self.conn.clone();
        let sha: String = self
            .script
            .prepare_invoke()
            .load_async(&mut conn)
            .await
            .map_err(script_error)?;
        debug!(sha = %sha, "redemption script loaded");
        Ok(())
    }

    /// SHA1 of the redemption script.
    pub fn script_hash(&self) -> &str {
        self.script.get_hash()
    }

    /// Get the backend configuration.
    pub fn config(&self) -> &RedisConfig {
        &self.config
    }
}

#[async_trait]
impl VoucherBackend for RedisBackend {
    async fn write_fields(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<(), VoucherError> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset_multiple(key, fields)
            .await
            .map_err(command_error)?;
        Ok(())
    }

    async fn read_fields(&self, key: &str) -> Result<Fields, VoucherError> {
        let mut conn = self.conn.clone();
        let fields: Fields = conn.hgetall(key).await.map_err(command_error)?;
        Ok(fields)
    }

    async fn decrement_if_positive(&self, key: &str, field: &str) -> Result<i64, VoucherError> {
        let mut conn = self.conn.clone();
        let value: i64 = self
            .script
            .key(key)
            .arg(field)
            .invoke_async(&mut conn)
            .await
            .map_err(script_error)?;
        Ok(value)
    }
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend")
            .field("config", &self.config)
            .field("script", &self.script.get_hash())
            .finish_non_exhaustive()
    }
}
