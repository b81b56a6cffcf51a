//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Backend Defaults
// ============================================================================

/// Default Redis connection URL.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";
/// Default backend kind: "redis" or "memory".
pub const DEFAULT_BACKEND_KIND: &str = "redis";
/// Default Redis connection timeout in milliseconds.
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 1000;
/// Default Redis response timeout in milliseconds.
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 1000;
/// Default number of reconnect attempts made by the connection manager.
pub const DEFAULT_NUMBER_OF_RETRIES: usize = 1;

// ============================================================================
// Store Defaults
// ============================================================================

/// Default key prefix (empty: the voucher code is the key).
pub const DEFAULT_KEY_PREFIX: &str = "";
/// Default reserved field policy: "overwrite" or "reject".
pub const DEFAULT_RESERVED_FIELD_POLICY: &str = "overwrite";

// ============================================================================
// Demo Defaults
// ============================================================================

/// Uses given to the demo voucher.
pub const DEMO_USES: u64 = 4;
/// Redemption attempts made by the demo.
pub const DEMO_ATTEMPTS: u32 = 5;

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
