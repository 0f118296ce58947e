/// Rounds `value` to `places` decimal places, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Converts a count sum to a signed difference, saturating instead of wrapping.
pub fn signed_difference(plus: u64, minus: u64) -> i64 {
    let diff = i128::from(plus) - i128::from(minus);
    i64::try_from(diff).unwrap_or(if diff > 0 { i64::MAX } else { i64::MIN })
}
