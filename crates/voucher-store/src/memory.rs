//! In-memory voucher backend.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use voucher_core::NOT_REDEEMABLE;

use crate::error::VoucherError;
use crate::record::Fields;
use crate::traits::VoucherBackend;

/// In-process backend using a mutex-guarded map of field-sets.
///
/// Suitable for tests, local runs and single-process deployments. The
/// decrement holds the lock for one synchronous map operation, so it has
/// the same indivisibility as the Redis script and the same results,
/// including the failure on non-numeric counters.
/// Uses `parking_lot::Mutex` which doesn't poison on panic.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    keys: Mutex<HashMap<String, Fields>>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    /// Check if no keys are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }

    /// Remove every key.
    pub fn clear(&self) {
        self.keys.lock().clear();
    }
}

/// Parse a counter the way Redis reads hash integers: plain decimal, an
/// optional `-`, no `+`, no leading zeros, no whitespace.
fn parse_strict_i64(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    let canonical = raw == "0"
        || matches!(
            digits.as_bytes(),
            [b'1'..=b'9', rest @ ..] if rest.iter().all(u8::is_ascii_digit)
        );
    if canonical { raw.parse().ok() } else { None }
}

/// Apply the check-and-decrement rule to a stored counter.
///
/// Mirrors the Redis script: a value that is not a number fails the script,
/// a positive value that is not a strict integer fails the increment.
fn decrement_value(raw: &str) -> Result<Option<i64>, VoucherError> {
    if let Some(n) = parse_strict_i64(raw) {
        return Ok((n > 0).then(|| n - 1));
    }

    let n: f64 = raw
        .trim()
        .parse()
        .ok()
        .filter(|n: &f64| n.is_finite())
        .ok_or_else(|| VoucherError::script("attempt to compare nil with number"))?;
    if n > 0.0 {
        Err(VoucherError::script("hash value is not an integer"))
    } else {
        Ok(None)
    }
}

#[async_trait]
impl VoucherBackend for MemoryBackend {
    async fn write_fields(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<(), VoucherError> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut keys = self.keys.lock();
        let entry = keys.entry(key.to_string()).or_default();
        for (name, value) in fields {
            entry.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    async fn read_fields(&self, key: &str) -> Result<Fields, VoucherError> {
        Ok(self.keys.lock().get(key).cloned().unwrap_or_default())
    }

    async fn decrement_if_positive(&self, key: &str, field: &str) -> Result<i64, VoucherError> {
        let mut keys = self.keys.lock();
        let Some(value) = keys.get_mut(key).and_then(|fields| fields.get_mut(field)) else {
            return Ok(NOT_REDEEMABLE);
        };

        match decrement_value(value)? {
            Some(next) => {
                *value = next.to_string();
                Ok(next)
            }
            None => Ok(NOT_REDEEMABLE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let backend = MemoryBackend::new();
        assert!(backend.is_empty());

        backend
            .write_fields("k", &pairs(&[("uses", "2"), ("note", "x")]))
            .await
            .unwrap();
        assert_eq!(backend.len(), 1);

        let fields = backend.read_fields("k").await.unwrap();
        assert_eq!(fields.get("uses").map(String::as_str), Some("2"));
        assert_eq!(fields.get("note").map(String::as_str), Some("x"));

        assert!(backend.read_fields("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_merges_fields() {
        let backend = MemoryBackend::new();
        backend
            .write_fields("k", &pairs(&[("a", "1"), ("b", "2")]))
            .await
            .unwrap();
        backend
            .write_fields("k", &pairs(&[("b", "3")]))
            .await
            .unwrap();

        let fields = backend.read_fields("k").await.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["b"], "3");
    }

    #[tokio::test]
    async fn test_decrement_sequence() {
        let backend = MemoryBackend::new();
        backend
            .write_fields("k", &pairs(&[("uses", "2")]))
            .await
            .unwrap();

        assert_eq!(backend.decrement_if_positive("k", "uses").await.unwrap(), 1);
        assert_eq!(backend.decrement_if_positive("k", "uses").await.unwrap(), 0);
        assert_eq!(backend.decrement_if_positive("k", "uses").await.unwrap(), -1);
        assert_eq!(backend.read_fields("k").await.unwrap()["uses"], "0");
    }

    #[tokio::test]
    async fn test_decrement_missing_key_or_field() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.decrement_if_positive("k", "uses").await.unwrap(), -1);

        backend
            .write_fields("k", &pairs(&[("other", "5")]))
            .await
            .unwrap();
        assert_eq!(backend.decrement_if_positive("k", "uses").await.unwrap(), -1);
    }

    #[tokio::test]
    async fn test_decrement_negative_left_unchanged() {
        let backend = MemoryBackend::new();
        backend
            .write_fields("k", &pairs(&[("uses", "-3")]))
            .await
            .unwrap();
        assert_eq!(backend.decrement_if_positive("k", "uses").await.unwrap(), -1);
        assert_eq!(backend.read_fields("k").await.unwrap()["uses"], "-3");
    }

    #[tokio::test]
    async fn test_decrement_non_numeric_is_script_error() {
        let backend = MemoryBackend::new();
        backend
            .write_fields("k", &pairs(&[("uses", "many")]))
            .await
            .unwrap();
        let err = backend.decrement_if_positive("k", "uses").await.unwrap_err();
        assert!(matches!(err, VoucherError::Script(_)));
    }

    #[tokio::test]
    async fn test_decrement_non_canonical_integer_is_script_error() {
        let backend = MemoryBackend::new();
        for raw in ["+5", "05", " 5", "5.0"] {
            backend
                .write_fields("k", &pairs(&[("uses", raw)]))
                .await
                .unwrap();
            let err = backend.decrement_if_positive("k", "uses").await.unwrap_err();
            assert!(matches!(err, VoucherError::Script(_)), "{raw}");
            assert_eq!(backend.read_fields("k").await.unwrap()["uses"], raw);
        }
    }

    #[test]
    fn test_parse_strict_i64() {
        assert_eq!(parse_strict_i64("0"), Some(0));
        assert_eq!(parse_strict_i64("42"), Some(42));
        assert_eq!(parse_strict_i64("-3"), Some(-3));
        assert_eq!(parse_strict_i64("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_strict_i64("9223372036854775808"), None);
        assert_eq!(parse_strict_i64("+5"), None);
        assert_eq!(parse_strict_i64("05"), None);
        assert_eq!(parse_strict_i64("-0"), None);
        assert_eq!(parse_strict_i64(""), None);
        assert_eq!(parse_strict_i64("-"), None);
    }

    #[tokio::test]
    async fn test_decrement_fractional() {
        let backend = MemoryBackend::new();
        backend
            .write_fields("k", &pairs(&[("uses", "1.5"), ("spent", "-0.5")]))
            .await
            .unwrap();
        assert!(matches!(
            backend.decrement_if_positive("k", "uses").await,
            Err(VoucherError::Script(_))
        ));
        assert_eq!(backend.decrement_if_positive("k", "spent").await.unwrap(), -1);
    }
}
