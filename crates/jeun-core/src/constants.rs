use chrono::Duration;

/// Elapsed fasting time after which autophagy is considered active.
pub const AUTOPHAGY_THRESHOLD_SECS: i64 = 16 * 60 * 60;

pub const FASTING_STATE_KEY: &str = "fasting_state";
pub const HISTORY_KEY: &str = "fasting_sessions_history";
pub const LOCAL_HISTORY_KEY: &str = "fasting_sessions_history.local";

pub fn autophagy_threshold() -> Duration {
    Duration::seconds(AUTOPHAGY_THRESHOLD_SECS)
}
