//! Redis voucher backend.
//!
//! Vouchers are Redis hashes keyed by voucher code. Redemption runs as a
//! Lua script, which Redis executes without interleaving any other command,
//! so concurrent redeemers on any number of hosts never observe a partial
//! check-and-decrement.
//!
//! # Features
//!
//! Enable the `redis` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! voucher-store = { version = "0.1", features = ["redis"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use voucher_store::redis_backend::{RedisBackend, RedisConfig};
//! use voucher_store::{RedemptionEngine, VoucherStore};
//!
//! let config = RedisConfig::new("redis://127.0.0.1:6379/0")
//!     .response_timeout(Duration::from_millis(500));
//! let backend = Arc::new(RedisBackend::connect(config).await?);
//!
//! let store = VoucherStore::new(backend.clone());
//! let engine = RedemptionEngine::new(backend);
//!
//! let code = store.create(4, None).await?;
//! assert_eq!(engine.redeem(code.as_str()).await?, 3);
//! ```
//!
//! # Data layout
//!
//! ```text
//! HSET <code> uses 4 created_at 2024-05-01T10:00:00.000000+00:00 description "10% off"
//! ```

mod backend;
mod config;
mod script;

#[cfg(test)]
mod tests;

pub use backend::RedisBackend;
pub use config::RedisConfig;
pub use script::REDEEM_SCRIPT;
