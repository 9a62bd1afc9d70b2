//! Number formatting for the score display.

/// Values at or above this are shown in scientific notation.
pub const DEFAULT_THRESHOLD: f64 = 1e6;
/// Decimal places kept by default.
pub const DEFAULT_PRECISION: u32 = 2;

/// Round half-up to `places` decimal places.
///
/// Half-up means `x.5` goes towards positive infinity (`-2.5 → -2`), unlike
/// `f64::round` which rounds away from zero.
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    // `+ 0.0` turns a negative zero into a positive one.
    (value * scale + 0.5).floor() / scale + 0.0
}

/// Format `value` as a plain decimal below `threshold`, and as
/// `{mantissa}e{exponent}` at or above it.
///
/// ```ignore
/// assert_eq!(format_scientific(999_999.0, 1e6, 2), "999999");
/// assert_eq!(format_scientific(1_234_567.0, 1e6, 2), "1.23e6");
/// ```
pub fn format_scientific(value: f64, threshold: f64, precision: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value < threshold || value <= 0.0 {
        return round_to(value, precision).to_string();
    }
    let exponent = value.log10().floor();
    let mantissa = round_to(value / 10f64.powi(exponent as i32), precision);
    format!("{}e{}", mantissa, exponent as i32)
}

/// [`format_scientific`] with the default threshold and precision.
pub fn format_default(value: f64) -> String {
    format_scientific(value, DEFAULT_THRESHOLD, DEFAULT_PRECISION)
}

/// `""` when the value reads as exactly one, `"s"` otherwise.
pub fn plural_suffix(value: f64) -> &'static str {
    if value.abs() == 1.0 {
        ""
    } else {
        "s"
    }
}
