//! `HH:MM:SS` rendering for transcript offsets.

/// Formats a seconds offset as a zero-padded `HH:MM:SS` string.
///
/// Fractions are truncated. Hours keep growing past 24 instead of wrapping,
/// so anything at or beyond 100 hours produces a wider string.
pub fn format_seconds(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    format!("{:0>8}", format!("{hours}:{minutes:02}:{secs:02}"))
}

/// Reads an `HH:MM:SS` string back into whole seconds.
pub fn parse_timestamp(value: &str) -> Option<u64> {
    let mut parts = value.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}
