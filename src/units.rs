//! Binary unit conversions and the rounding policy shared by every derived value.
//!
//! All conversions use powers of 1024. Every converted or derived value is
//! rounded to two decimals with [`f64::round`] (half away from zero).

/// Kilobytes per megabyte, megabytes per gigabyte.
pub const BINARY_STEP: f64 = 1024.0;

/// Bytes in one gigabyte (2^30).
pub const BYTES_PER_GB: f64 = 1_073_741_824.0;

/// Kilobytes in one gigabyte (2^20).
pub const KB_PER_GB: f64 = 1_048_576.0;

/// Rounds to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Bytes to GB, rounded.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GB)
}

/// MB to GB, rounded.
pub fn mb_to_gb(mb: f64) -> f64 {
    round2(mb / BINARY_STEP)
}

/// KB to GB, rounded.
pub fn kb_to_gb(kb: f64) -> f64 {
    round2(kb / KB_PER_GB)
}

/// `round2(numerator / denominator)`, or `None` when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(round2(numerator / denominator))
    }
}

/// Percentage by which `allocated` exceeds `capacity`; negative when under-committed.
pub fn overcommit_percent(allocated: f64, capacity: f64) -> Option<f64> {
    if capacity == 0.0 {
        None
    } else {
        Some(round2((allocated - capacity) / capacity * 100.0))
    }
}
