//! # voucher-rs
//!
//! Finite-use vouchers backed by a key-value store, with redemption
//! performed as one atomic check-and-decrement inside the backend.
//!
//! ## Crates
//!
//! - [`voucher_core`] - Shared constants, field names and defaults
//! - [`voucher_store`] - Backends, voucher store, redemption engine and CLI
//! - [`voucher_config`] - Configuration loading and validation

pub use voucher_config as config;
pub use voucher_core as core;
pub use voucher_store as store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use voucher_config::{Config, load_config, validate_config};
    #[cfg(feature = "redis")]
    pub use voucher_store::{RedisBackend, RedisConfig};
    pub use voucher_store::{
        MemoryBackend, Metadata, NOT_REDEEMABLE, Redemption, RedemptionEngine, VoucherBackend,
        VoucherCode, VoucherError, VoucherStore,
    };
}
