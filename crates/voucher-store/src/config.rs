//! Configuration for [`VoucherStore`](crate::VoucherStore) and
//! [`RedemptionEngine`](crate::RedemptionEngine).

use std::str::FromStr;

use voucher_core::defaults;

/// What to do when creation metadata uses a reserved field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservedFieldPolicy {
    /// Metadata is applied after the reserved fields and wins.
    /// A warning is logged for each overwritten field.
    #[default]
    Overwrite,

    /// Creation fails with [`VoucherError::ReservedField`](crate::VoucherError::ReservedField)
    /// before anything is written.
    Reject,
}

impl FromStr for ReservedFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown reserved field policy: {other}")),
        }
    }
}

/// Shared configuration consumed by the store and the engine.
///
/// Both must use the same `key_prefix`, otherwise redemptions target keys
/// that were never created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Prefix prepended to every voucher code to form the backend key.
    pub key_prefix: String,
    /// Reserved field collision handling on create.
    pub reserved_fields: ReservedFieldPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: defaults::DEFAULT_KEY_PREFIX.to_string(),
            reserved_fields: ReservedFieldPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Builder: set key prefix.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Builder: set reserved field policy.
    pub fn reserved_fields(mut self, policy: ReservedFieldPolicy) -> Self {
        self.reserved_fields = policy;
        self
    }

    /// Backend key for a voucher code.
    #[inline]
    pub fn key_for(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key_is_code() {
        let config = StoreConfig::default();
        assert_eq!(config.key_for("abc"), "abc");
        assert_eq!(config.reserved_fields, ReservedFieldPolicy::Overwrite);
    }

    #[test]
    fn test_key_prefix() {
        let config = StoreConfig::default().key_prefix("voucher:");
        assert_eq!(config.key_for("abc"), "voucher:abc");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "Reject".parse::<ReservedFieldPolicy>(),
            Ok(ReservedFieldPolicy::Reject)
        );
        assert_eq!(
            "overwrite".parse::<ReservedFieldPolicy>(),
            Ok(ReservedFieldPolicy::Overwrite)
        );
        assert!("namespace".parse::<ReservedFieldPolicy>().is_err());
    }
}
