//! Finite-use vouchers with atomic redemption.
//!
//! A voucher is a randomly generated code mapped to a flat field-set in a
//! key-value backend: a remaining `uses` counter, a `created_at` timestamp
//! and arbitrary caller metadata. Redemption decrements the counter inside
//! the backend in one atomic step, so concurrent callers can never consume
//! more uses than were issued.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use voucher_store::{MemoryBackend, Metadata, RedemptionEngine, VoucherStore};
//!
//! # async fn example() -> Result<(), voucher_store::VoucherError> {
//! let backend = Arc::new(MemoryBackend::new());
//! let store = VoucherStore::new(backend.clone());
//! let engine = RedemptionEngine::new(backend);
//!
//! let mut metadata = Metadata::new();
//! metadata.insert("description".into(), "10% off on all items".into());
//!
//! let code = store.create(2, Some(&metadata)).await?;
//! assert_eq!(engine.redeem(code.as_str()).await?, 1);
//! assert_eq!(engine.redeem(code.as_str()).await?, 0);
//! assert_eq!(engine.redeem(code.as_str()).await?, -1);
//! # Ok(())
//! # }
//! ```

mod code;
mod config;
mod engine;
mod error;
mod memory;
mod record;
mod store;
mod traits;

pub mod cli;
#[cfg(feature = "redis")]
pub mod redis_backend;

pub use cli::VoucherArgs;
pub use code::VoucherCode;
pub use config::{ReservedFieldPolicy, StoreConfig};
pub use engine::{Redemption, RedemptionEngine};
pub use error::VoucherError;
pub use memory::MemoryBackend;
pub use record::{
    Fields, Metadata, VoucherRecord, decode_timestamp, decode_uses, encode_timestamp, encode_uses,
};
pub use store::VoucherStore;
pub use traits::VoucherBackend;
pub use voucher_core::NOT_REDEEMABLE;

#[cfg(feature = "redis")]
pub use redis_backend::{RedisBackend, RedisConfig};
