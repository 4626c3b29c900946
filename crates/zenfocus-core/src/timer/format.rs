/// Format a second count as `MM:SS`.
///
/// Both fields are zero-padded to two digits. Values of 100 minutes or more
/// keep the full minute count (`6000` -> `"100:00"`).
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// 0.0 .. 1.0 progress through a countdown of `total` seconds.
pub fn progress_ratio(remaining: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    1.0 - (remaining.min(total) as f64 / total as f64)
}
