//! Voucher error types.

use voucher_core::errors;

/// Voucher store error.
///
/// A voucher that is absent or exhausted is not an error: redemption
/// reports it as [`NOT_REDEEMABLE`](voucher_core::NOT_REDEEMABLE).
#[derive(Debug, thiserror::Error)]
pub enum VoucherError {
    /// Backend unreachable, connection dropped, or request timed out.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The atomic redemption script failed to run.
    #[error("script execution failed: {0}")]
    Script(String),

    /// Any other backend error.
    #[error("backend error: {0}")]
    Backend(String),

    /// Requested use count exceeds what the backend counter can hold.
    #[error("uses {0} exceeds the maximum of {max}", max = voucher_core::MAX_USES)]
    InvalidUses(u64),

    /// Metadata key collides with a reserved field.
    #[error("metadata key '{0}' is a reserved field")]
    ReservedField(String),

    /// A stored field could not be parsed.
    #[error("invalid voucher record: {0}")]
    InvalidRecord(String),
}

impl VoucherError {
    /// Create an unavailable error from any error type.
    #[inline]
    pub fn unavailable<E: std::fmt::Display>(err: E) -> Self {
        Self::Unavailable(err.to_string())
    }

    /// Create a script error from any error type.
    #[inline]
    pub fn script<E: std::fmt::Display>(err: E) -> Self {
        Self::Script(err.to_string())
    }

    /// Create a backend error from any error type.
    #[inline]
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }

    /// Whether this error means the backend could not be reached.
    #[inline]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Error kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => errors::ERROR_UNAVAILABLE,
            Self::Script(_) => errors::ERROR_SCRIPT,
            Self::Backend(_) => errors::ERROR_BACKEND,
            Self::InvalidUses(_) => errors::ERROR_INVALID_USES,
            Self::ReservedField(_) => errors::ERROR_RESERVED_FIELD,
            Self::InvalidRecord(_) => errors::ERROR_INVALID_RECORD,
        }
    }
}
