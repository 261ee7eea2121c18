//! Time formatting helpers.

/// Render a short duration as a compact human-readable string.
///
/// Used in log lines (cooldown remaining, sweep ages) where raw second
/// counts are hard to scan. The quantities logged here are minutes to a
/// few hours, so there is no day granularity; anything longer renders in
/// hours.
pub fn format_duration(secs: u64) -> String {
    let (hours, rem) = (secs / 3600, secs % 3600);
    let (mins, secs) = (rem / 60, rem % 60);
    match (hours, mins) {
        (0, 0) => format!("{secs}s"),
        (0, _) => format!("{mins}m {secs}s"),
        (_, _) => format!("{hours}h {mins}m"),
    }
}
