//! Voucher record creation and retrieval.

use chrono::Utc;
use tracing::{debug, info, warn};
use voucher_core::{FIELD_CREATED_AT, FIELD_USES, MAX_USES, is_reserved_field};

use crate::code::VoucherCode;
use crate::config::{ReservedFieldPolicy, StoreConfig};
use crate::error::VoucherError;
use crate::record::{Fields, Metadata, VoucherRecord, encode_timestamp, encode_uses};
use crate::traits::VoucherBackend;

/// Creates and reads voucher records in a [`VoucherBackend`].
///
/// Each voucher is one flat field-set keyed by its code: `uses`,
/// `created_at` and every metadata entry, all stored as text.
/// The store never changes `uses` after creation; that is the job of
/// [`RedemptionEngine`](crate::RedemptionEngine).
///
/// # Type parameter
///
/// - `B` - the backend (e.g. `RedisBackend`, `Arc<MemoryBackend>`)
pub struct VoucherStore<B: VoucherBackend> {
    backend: B,
    config: StoreConfig,
}

impl<B: VoucherBackend> VoucherStore<B> {
    /// Create a store with default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    /// Create a store with the given configuration.
    pub fn with_config(backend: B, config: StoreConfig) -> Self {
        Self { backend, config }
    }

    /// Get a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Build the field-set written for a new voucher.
    fn build_fields(
        &self,
        uses: u64,
        metadata: Option<&Metadata>,
    ) -> Result<Vec<(String, String)>, VoucherError> {
        let mut fields = vec![
            (FIELD_USES.to_string(), encode_uses(uses)),
            (FIELD_CREATED_AT.to_string(), encode_timestamp(Utc::now())),
        ];

        for (name, value) in metadata.into_iter().flatten() {
            if !is_reserved_field(name) {
                fields.push((name.clone(), value.clone()));
                continue;
            }

            match self.config.reserved_fields {
                ReservedFieldPolicy::Reject => {
                    return Err(VoucherError::ReservedField(name.clone()));
                }
                ReservedFieldPolicy::Overwrite => {
                    warn!(field = %name, "metadata overwrites reserved voucher field");
                    if let Some(slot) = fields.iter_mut().find(|(n, _)| n == name) {
                        slot.1.clone_from(value);
                    }
                }
            }
        }

        Ok(fields)
    }

    /// Create a voucher with `uses` redemptions and optional metadata.
    ///
    /// Writes the whole field-set in one backend call and returns the newly
    /// generated code. `uses` above [`MAX_USES`] is rejected before any write.
    pub async fn create(
        &self,
        uses: u64,
        metadata: Option<&Metadata>,
    ) -> Result<VoucherCode, VoucherError> {
        if uses > MAX_USES {
            return Err(VoucherError::InvalidUses(uses));
        }
        let fields = self.build_fields(uses, metadata)?;
        let code = VoucherCode::generate();
        let key = self.config.key_for(code.as_str());

        debug!(key = %key, fields = fields.len(), "writing voucher");
        if let Err(e) = self.backend.write_fields(&key, &fields).await {
            warn!(code = %code, error = %e, kind = e.kind(), "voucher write failed");
            return Err(e);
        }

        info!(code = %code, uses, "voucher generated");
        Ok(code)
    }

    /// Read the raw field-set of a voucher.
    ///
    /// Returns an empty map if the voucher does not exist.
    pub async fn get(&self, code: &str) -> Result<Fields, VoucherError> {
        let key = self.config.key_for(code);
        debug!(key = %key, "reading voucher");
        self.backend.read_fields(&key).await
    }

    /// Read and parse a voucher. Returns `None` if it does not exist.
    pub async fn record(&self, code: &str) -> Result<Option<VoucherRecord>, VoucherError> {
        let fields = self.get(code).await?;
        VoucherRecord::from_fields(&fields)
    }

    /// Check whether a voucher exists, regardless of its remaining uses.
    pub async fn exists(&self, code: &str) -> Result<bool, VoucherError> {
        Ok(!self.get(code).await?.is_empty())
    }

    /// Remaining uses of a voucher, or `None` if it does not exist.
    pub async fn uses(&self, code: &str) -> Result<Option<u64>, VoucherError> {
        Ok(self.record(code).await?.map(|r| r.uses))
    }
}

impl<B: VoucherBackend + std::fmt::Debug> std::fmt::Debug for VoucherStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoucherStore")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::memory::MemoryBackend;

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = VoucherStore::new(MemoryBackend::new());
        let meta = metadata(&[
            ("description", "10% off on all items"),
            ("expiry_date", "2024-12-31T23:59:59"),
        ]);

        let code = store.create(4, Some(&meta)).await.unwrap();
        let fields = store.get(code.as_str()).await.unwrap();

        assert_eq!(fields["uses"], "4");
        assert_eq!(fields["description"], "10% off on all items");
        assert_eq!(fields["expiry_date"], "2024-12-31T23:59:59");
        assert!(crate::record::decode_timestamp(&fields["created_at"]).is_ok());
        assert_eq!(fields.len(), 4);
    }

    #[tokio::test]
    async fn test_create_without_metadata() {
        let store = VoucherStore::new(MemoryBackend::new());
        let code = store.create(0, None).await.unwrap();

        let record = store.record(code.as_str()).await.unwrap().unwrap();
        assert_eq!(record.uses, 0);
        assert!(record.metadata.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_empty() {
        let store = VoucherStore::new(MemoryBackend::new());
        assert!(store.get("nope").await.unwrap().is_empty());
        assert!(store.record("nope").await.unwrap().is_none());
        assert!(!store.exists("nope").await.unwrap());
        assert_eq!(store.uses("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_exhausted_voucher_still_exists() {
        let store = VoucherStore::new(MemoryBackend::new());
        let code = store.create(0, None).await.unwrap();
        assert!(store.exists(code.as_str()).await.unwrap());
        assert_eq!(store.uses(code.as_str()).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_reserved_field_overwrite() {
        let store = VoucherStore::new(MemoryBackend::new());
        let meta = metadata(&[("uses", "9"), ("note", "x")]);

        let code = store.create(1, Some(&meta)).await.unwrap();
        let fields = store.get(code.as_str()).await.unwrap();
        assert_eq!(fields["uses"], "9");
        assert_eq!(fields["note"], "x");
    }

    #[tokio::test]
    async fn test_reserved_field_reject_writes_nothing() {
        let backend = Arc::new(MemoryBackend::new());
        let config = StoreConfig::default().reserved_fields(ReservedFieldPolicy::Reject);
        let store = VoucherStore::with_config(backend.clone(), config);
        let meta = metadata(&[("created_at", "yesterday")]);

        let err = store.create(1, Some(&meta)).await.unwrap_err();
        assert!(matches!(err, VoucherError::ReservedField(ref f) if f == "created_at"));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_uses_above_counter_range_writes_nothing() {
        let backend = Arc::new(MemoryBackend::new());
        let store = VoucherStore::new(backend.clone());

        let err = store.create(u64::MAX, None).await.unwrap_err();
        assert!(matches!(err, VoucherError::InvalidUses(u64::MAX)));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_max_uses_is_redeemable() {
        let backend = Arc::new(MemoryBackend::new());
        let store = VoucherStore::new(backend.clone());
        let engine = crate::engine::RedemptionEngine::new(backend);

        let code = store.create(MAX_USES, None).await.unwrap();
        assert_eq!(
            engine.redeem(code.as_str()).await.unwrap(),
            i64::MAX - 1
        );
    }

    #[tokio::test]
    async fn test_key_prefix_applied() {
        let backend = Arc::new(MemoryBackend::new());
        let store = VoucherStore::with_config(
            backend.clone(),
            StoreConfig::default().key_prefix("voucher:"),
        );

        let code = store.create(2, None).await.unwrap();
        let raw = backend
            .read_fields(&format!("voucher:{code}"))
            .await
            .unwrap();
        assert_eq!(raw["uses"], "2");
        assert!(backend.read_fields(code.as_str()).await.unwrap().is_empty());
    }

    #[test]
    fn test_debug_impl() {
        let store = VoucherStore::new(MemoryBackend::new());
        let debug_str = format!("{store:?}");
        assert!(debug_str.contains("VoucherStore"));
        assert!(debug_str.contains("MemoryBackend"));
    }
}
