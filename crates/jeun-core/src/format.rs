use chrono::Duration;

/// `HH:MM:SS` for the live counter. Negative input (clock skew) clamps to
/// zero; only raw engine values keep the sign.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// `15h 30m` for summaries and statistics.
pub fn format_duration_short(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{}h {}m", total / 3600, (total % 3600) / 60)
}
