//! Duration and ratio helpers used when shaping report responses.
//!
//! Tracked time is stored in whole seconds. Reports expose both the raw
//! seconds and a human readable `"Xh Ym"` rendering.

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Formats a number of seconds as `"Xh Ym"`.
///
/// Seconds below a full minute are truncated. Negative input is treated as zero.
///
/// # Example
/// ```
/// use shared::duration::format_duration;
///
/// assert_eq!(format_duration(3661), "1h 1m");
/// assert_eq!(format_duration(59), "0h 0m");
/// ```
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    format!("{}h {}m", hours, minutes)
}

/// Converts seconds to hours, rounded to two decimals.
pub fn seconds_to_hours(seconds: i64) -> f64 {
    round_to(seconds as f64 / SECONDS_PER_HOUR as f64, 2)
}

/// Returns `part / whole * 100` rounded to one decimal.
///
/// A non-positive `whole` yields `0.0` instead of NaN or infinity.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    round_to(part as f64 * 100.0 / whole as f64, 1)
}

/// Rounds to the given number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
