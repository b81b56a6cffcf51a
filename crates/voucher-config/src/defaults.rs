//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `voucher_core::defaults`.

use voucher_core::defaults;

/// Generate default value functions that forward to voucher_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_connection_timeout_ms => DEFAULT_CONNECTION_TIMEOUT_MS: u64,
    default_response_timeout_ms   => DEFAULT_RESPONSE_TIMEOUT_MS: u64,
    default_number_of_retries     => DEFAULT_NUMBER_OF_RETRIES: usize,
}

default_string_fns! {
    default_backend_kind          => DEFAULT_BACKEND_KIND,
    default_redis_url             => DEFAULT_REDIS_URL,
    default_key_prefix            => DEFAULT_KEY_PREFIX,
    default_reserved_field_policy => DEFAULT_RESERVED_FIELD_POLICY,
}
