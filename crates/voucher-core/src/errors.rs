//! Error kind constants for logging.
//!
//! These constants provide consistent error classification across all crates.

/// Backend unreachable, connection dropped or timed out.
pub const ERROR_UNAVAILABLE: &str = "unavailable";
/// Atomic script failed to execute.
pub const ERROR_SCRIPT: &str = "script";
/// Any other backend error.
pub const ERROR_BACKEND: &str = "backend";
/// Stored record could not be parsed.
pub const ERROR_INVALID_RECORD: &str = "invalid_record";
/// Requested use count out of range.
pub const ERROR_INVALID_USES: &str = "invalid_uses";
/// Metadata collided with a reserved field.
pub const ERROR_RESERVED_FIELD: &str = "reserved_field";
