//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override Redis URL, e.g. redis://127.0.0.1:6379/0
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,
    /// Use the in-process backend instead of Redis
    #[arg(long)]
    pub memory: bool,
    /// Override Redis connection timeout (milliseconds)
    #[arg(long)]
    pub connection_timeout_ms: Option<u64>,
    /// Override Redis response timeout (milliseconds)
    #[arg(long)]
    pub response_timeout_ms: Option<u64>,
    /// Override Redis reconnect attempts
    #[arg(long)]
    pub number_of_retries: Option<usize>,
    /// Override key prefix prepended to voucher codes
    #[arg(long)]
    pub key_prefix: Option<String>,
    /// Override reserved field policy (overwrite, reject)
    #[arg(long)]
    pub reserved_fields: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.redis_url {
        config.backend.redis_url = v.clone();
    }
    if overrides.memory {
        config.backend.kind = "memory".into();
    }
    if let Some(v) = overrides.connection_timeout_ms {
        config.backend.connection_timeout_ms = v;
    }
    if let Some(v) = overrides.response_timeout_ms {
        config.backend.response_timeout_ms = v;
    }
    if let Some(v) = overrides.number_of_retries {
        config.backend.number_of_retries = v;
    }
    if let Some(v) = &overrides.key_prefix {
        config.store.key_prefix = v.clone();
    }
    if let Some(v) = &overrides.reserved_fields {
        config.store.reserved_fields = v.clone();
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
}
