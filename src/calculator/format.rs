//! Display formatting for calculator values.
//!
//! Computed values go through [`format_value`]. Operands the user is still
//! typing are echoed as text and never pass through here, except in
//! fixed-point mode where the digit string is laid out by [`format_fixed`].

/// Significant digits kept when rendering a computed value.
pub const SIGNIFICANT_DIGITS: usize = 15;

/// Magnitudes below this render as zero.
const MIN_MAGNITUDE: f64 = 1e-15;

/// Format a computed value for display.
///
/// Rounds to [`SIGNIFICANT_DIGITS`] to hide binary noise (`0.1 + 0.2`),
/// then prints the shortest decimal that round-trips, without exponent
/// notation and without trailing zeros.
pub fn format_value(value: f64) -> String {
    let rounded = round_significant(value);

    // Also catches negative zero
    if rounded.abs() < MIN_MAGNITUDE {
        return "0".to_string();
    }

    format!("{}", rounded)
}

fn round_significant(value: f64) -> f64 {
    format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Lay out a cash-register digit string with an implicit decimal point
/// `places` digits from the right.
///
/// An empty digit string renders as `"0"`.
pub fn format_fixed(digits: &str, places: u8) -> String {
    if digits.is_empty() {
        return "0".to_string();
    }

    let places = places as usize;
    if places == 0 {
        return digits.to_string();
    }

    let padded = format!("{:0>width$}", digits, width = places + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - places);
    format!("{}.{}", int_part, frac_part)
}
