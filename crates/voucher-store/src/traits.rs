//! Backend capability trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::VoucherError;
use crate::record::Fields;

/// Key-value backend holding voucher field-sets.
///
/// Implementations must be thread-safe (`Send + Sync`) as they may be
/// called concurrently from many tasks. The backend needs two capabilities:
/// per-key field-set storage and an atomic check-and-decrement executed by
/// the backend itself.
#[async_trait]
pub trait VoucherBackend: Send + Sync {
    /// Set several fields of `key` in one call, creating the key if needed.
    async fn write_fields(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<(), VoucherError>;

    /// Read every field of `key`.
    ///
    /// Returns an empty map when the key does not exist.
    async fn read_fields(&self, key: &str) -> Result<Fields, VoucherError>;

    /// Atomically decrement `field` of `key` if its numeric value is positive.
    ///
    /// # Returns
    /// * `Ok(n)` with `n >= 0` - the value after the decrement
    /// * `Ok(-1)` - the field is absent or its value is `<= 0`; nothing changed
    /// * `Err(VoucherError)` - the operation could not be executed
    ///
    /// The read, the check and the write must be indivisible with respect
    /// to every other call on the same key.
    async fn decrement_if_positive(&self, key: &str, field: &str) -> Result<i64, VoucherError>;
}

/// Blanket implementation for `Arc<B>` where `B: VoucherBackend`.
///
/// This lets a [`VoucherStore`](crate::VoucherStore) and a
/// [`RedemptionEngine`](crate::RedemptionEngine) share one backend.
#[async_trait]
impl<B: VoucherBackend + ?Sized> VoucherBackend for Arc<B> {
    #[inline]
    async fn write_fields(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<(), VoucherError> {
        (**self).write_fields(key, fields).await
    }

    #[inline]
    async fn read_fields(&self, key: &str) -> Result<Fields, VoucherError> {
        (**self).read_fields(key).await
    }

    #[inline]
    async fn decrement_if_positive(&self, key: &str, field: &str) -> Result<i64, VoucherError> {
        (**self).decrement_if_positive(key, field).await
    }
}

/// Blanket implementation for `Box<B>` where `B: VoucherBackend`.
#[async_trait]
impl<B: VoucherBackend + ?Sized> VoucherBackend for Box<B> {
    #[inline]
    async fn write_fields(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<(), VoucherError> {
        (**self).write_fields(key, fields).await
    }

    #[inline]
    async fn read_fields(&self, key: &str) -> Result<Fields, VoucherError> {
        (**self).read_fields(key).await
    }

    #[inline]
    async fn decrement_if_positive(&self, key: &str, field: &str) -> Result<i64, VoucherError> {
        (**self).decrement_if_positive(key, field).await
    }
}
