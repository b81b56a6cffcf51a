//! Core constants shared across voucher crates.
//!
//! This crate provides:
//! - Reserved field names of the voucher field-set
//! - Default configuration values
//! - Error kind constants for logging

pub mod defaults;
pub mod errors;
pub mod fields;

// Re-export commonly used items at crate root
pub use defaults::*;
pub use errors::*;
pub use fields::*;

/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest use count a voucher can hold.
///
/// Backends keep the counter as a signed 64-bit integer.
pub const MAX_USES: u64 = i64::MAX as u64;

/// Value returned by a redemption when the voucher is absent or exhausted.
pub const NOT_REDEEMABLE: i64 = -1;
