//! Voucher records and their field-set encoding.
//!
//! The backend stores every field as text. This module is the only place
//! that converts between typed values and their stored representation:
//! integers as canonical decimal text, timestamps as ISO-8601 in UTC.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};
use voucher_core::{FIELD_CREATED_AT, FIELD_USES, is_reserved_field};

use crate::error::VoucherError;

/// Raw field-set as read from the backend.
pub type Fields = HashMap<String, String>;

/// Caller-supplied metadata attached to a voucher at creation.
pub type Metadata = BTreeMap<String, String>;

/// Encode a use counter as stored text.
#[inline]
pub fn encode_uses(uses: u64) -> String {
    uses.to_string()
}

/// Encode a timestamp as stored text (`2024-05-01T10:00:00.123456+00:00`).
#[inline]
pub fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse a stored use counter.
pub fn decode_uses(raw: &str) -> Result<u64, VoucherError> {
    raw.trim()
        .parse()
        .map_err(|_| VoucherError::InvalidRecord(format!("{FIELD_USES} = {raw:?}")))
}

/// Parse a stored timestamp.
pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, VoucherError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| VoucherError::InvalidRecord(format!("{FIELD_CREATED_AT} = {raw:?}: {e}")))
}

/// Typed view of a stored voucher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherRecord {
    /// Remaining redemptions.
    pub uses: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Every non-reserved field.
    pub metadata: Metadata,
}

impl VoucherRecord {
    /// Parse a field-set read from the backend.
    ///
    /// Returns `Ok(None)` for an empty field-set (the voucher does not exist).
    pub fn from_fields(fields: &Fields) -> Result<Option<Self>, VoucherError> {
        if fields.is_empty() {
            return Ok(None);
        }

        let uses = fields
            .get(FIELD_USES)
            .ok_or_else(|| VoucherError::InvalidRecord(format!("missing {FIELD_USES}")))
            .and_then(|raw| decode_uses(raw))?;
        let created_at = fields
            .get(FIELD_CREATED_AT)
            .ok_or_else(|| VoucherError::InvalidRecord(format!("missing {FIELD_CREATED_AT}")))
            .and_then(|raw| decode_timestamp(raw))?;
        let metadata = fields
            .iter()
            .filter(|(k, _)| !is_reserved_field(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Some(Self {
            uses,
            created_at,
            metadata,
        }))
    }

    /// Whether the voucher has no redemptions left.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.uses == 0
    }
}
