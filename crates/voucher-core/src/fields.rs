//! Field names of the voucher field-set.

/// Remaining redemptions, stored as canonical decimal text.
pub const FIELD_USES: &str = "uses";
/// Creation timestamp, stored as ISO-8601 text in UTC.
pub const FIELD_CREATED_AT: &str = "created_at";

/// Fields written by the store itself. Metadata keys with these names
/// collide with the voucher's own bookkeeping.
pub const RESERVED_FIELDS: [&str; 2] = [FIELD_USES, FIELD_CREATED_AT];

/// Check if a field name is reserved.
#[inline]
pub fn is_reserved_field(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_fields() {
        assert!(is_reserved_field("uses"));
        assert!(is_reserved_field("created_at"));
        assert!(!is_reserved_field("description"));
        assert!(!is_reserved_field("Uses"));
    }
}
