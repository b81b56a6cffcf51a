//! Lua source of the atomic redemption.

/// Check-and-decrement of one hash field.
///
/// `KEYS[1]` is the voucher key, `ARGV[1]` the counter field name.
/// Returns the decremented value, or `-1` when the field is missing or
/// not positive. A non-numeric field raises a script error.
pub const REDEEM_SCRIPT: &str = r"
local current = redis.call('HGET', KEYS[1], ARGV[1])
if current and tonumber(current) > 0 then
    return redis.call('HINCRBY', KEYS[1], ARGV[1], -1)
else
    return -1
end
";
