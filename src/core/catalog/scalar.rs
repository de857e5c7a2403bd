//! Scalar text parsing and the numeric rounding policy

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept after every conversion
pub const SCALAR_PRECISION: u32 = 12;

// Above this magnitude fixed-point rounding is meaningless for f64
const FIXED_POINT_LIMIT: f64 = 1e21;

// Signed decimal with optional fraction, surrounding whitespace ignored.
// Exponents, thousands separators and bare signs are rejected.
static RE_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+(\.\d+)?|\.\d+)\s*$")
        .expect("Failed to compile decimal pattern")
});

/// Check if the text is a number, with or without decimals
pub fn is_decimal(text: &str) -> bool {
    RE_DECIMAL.is_match(text)
}

/// Read a scalar from user text; `None` means unreadable
pub fn parse_scalar(text: &str) -> Option<f64> {
    if !is_decimal(text) {
        return None;
    }
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Round to `SCALAR_PRECISION` decimal places and re-read as f64.
///
/// Midpoints round away from zero. Non-finite values and magnitudes of 1e21
/// or more are returned unchanged.
pub fn round_scalar(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= FIXED_POINT_LIMIT {
        return value;
    }

    match Decimal::from_f64_retain(value) {
        Some(decimal) => decimal
            .round_dp_with_strategy(SCALAR_PRECISION, RoundingStrategy::MidpointAwayFromZero)
            .to_string()
            .parse::<f64>()
            .unwrap_or(value),
        None => format!("{:.*}", SCALAR_PRECISION as usize, value)
            .parse::<f64>()
            .unwrap_or(value),
    }
}

/// Text written back into a scalar input
pub fn format_scalar(value: f64) -> String {
    // -0 reads back as 0 and displays as "-0" otherwise
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
