//! Configuration validation logic.

use crate::Config;
use crate::loader::ConfigError;

const BACKEND_KINDS: [&str; 2] = ["redis", "memory"];
const RESERVED_FIELD_POLICIES: [&str; 2] = ["overwrite", "reject"];
const REDIS_SCHEMES: [&str; 4] = ["redis://", "rediss://", "redis+unix://", "unix://"];

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let kind = config.backend.kind.to_ascii_lowercase();
    if !BACKEND_KINDS.contains(&kind.as_str()) {
        return Err(ConfigError::Validation(format!(
            "backend.kind must be one of: {:?}",
            BACKEND_KINDS
        )));
    }
    if !config.backend.is_memory() {
        let url = config.backend.redis_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation("backend.redis_url is empty".into()));
        }
        if !REDIS_SCHEMES.iter().any(|s| url.starts_with(s)) {
            return Err(ConfigError::Validation(format!(
                "backend.redis_url must start with one of: {:?}",
                REDIS_SCHEMES
            )));
        }
    }
    if config.backend.connection_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "backend.connection_timeout_ms must be > 0".into(),
        ));
    }
    if config.backend.response_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "backend.response_timeout_ms must be > 0".into(),
        ));
    }
    let policy = config.store.reserved_fields.to_ascii_lowercase();
    if !RESERVED_FIELD_POLICIES.contains(&policy.as_str()) {
        return Err(ConfigError::Validation(format!(
            "store.reserved_fields must be one of: {:?}",
            RESERVED_FIELD_POLICIES
        )));
    }
    if config.store.key_prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(
            "store.key_prefix must not contain whitespace".into(),
        ));
    }
    Ok(())
}
