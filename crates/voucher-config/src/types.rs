//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where vouchers are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend kind: "redis" or "memory".
    #[serde(default = "default_backend_kind")]
    pub kind: String,
    /// Redis connection URL (only used with kind = "redis").
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Connection timeout in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
    /// Per-command response timeout in milliseconds.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
    /// Reconnect attempts made by the connection manager.
    #[serde(default = "default_number_of_retries")]
    pub number_of_retries: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: default_backend_kind(),
            redis_url: default_redis_url(),
            connection_timeout_ms: default_connection_timeout_ms(),
            response_timeout_ms: default_response_timeout_ms(),
            number_of_retries: default_number_of_retries(),
        }
    }
}

impl BackendConfig {
    /// Whether the in-process backend is selected.
    pub fn is_memory(&self) -> bool {
        self.kind.eq_ignore_ascii_case("memory")
    }
}

/// Voucher key layout and creation rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    /// Prefix prepended to voucher codes to form backend keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Metadata collision with reserved fields: "overwrite" or "reject".
    #[serde(default = "default_reserved_field_policy")]
    pub reserved_fields: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            reserved_fields: default_reserved_field_policy(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace/debug/info/warn/error).
    pub level: Option<String>,
}
