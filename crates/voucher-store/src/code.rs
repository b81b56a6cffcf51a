//! Voucher codes.

use std::fmt;

use uuid::Uuid;

/// Unique voucher identifier.
///
/// Generated codes are random UUID v4 values in hyphenated lowercase form.
/// Any string is accepted when looking up or redeeming a voucher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoucherCode(String);

impl VoucherCode {
    /// Generate a new random code.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the code as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the code and return the inner string.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for VoucherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VoucherCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for VoucherCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&str> for VoucherCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}
