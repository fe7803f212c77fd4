use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::autophagy_threshold;

/// Current fasting state, mirrored verbatim between the two device peers.
/// Invariant: `is_fasting` is true exactly when `started_at` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FastingState {
    pub is_fasting: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub last_duration_seconds: Option<i64>,
}

impl FastingState {
    pub fn fasting(started_at: DateTime<Utc>, last_duration_seconds: Option<i64>) -> Self {
        Self {
            is_fasting: true,
            started_at: Some(started_at),
            last_duration_seconds,
        }
    }

    pub fn idle(last_duration_seconds: Option<i64>) -> Self {
        Self {
            is_fasting: false,
            started_at: None,
            last_duration_seconds,
        }
    }

    /// Raw elapsed time; can be negative when `started_at` lies in the
    /// future (clock skew between devices). Display paths clamp to zero.
    pub fn fasting_duration(&self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_fasting {
            return None;
        }
        self.started_at.map(|started_at| now - started_at)
    }

    pub fn autophagy_started(&self, now: DateTime<Utc>) -> bool {
        self.fasting_duration(now)
            .map(|duration| duration >= autophagy_threshold())
            .unwrap_or(false)
    }

    pub fn time_until_autophagy(&self, now: DateTime<Utc>) -> Option<Duration> {
        let remaining = autophagy_threshold() - self.fasting_duration(now)?;
        (remaining > Duration::zero()).then_some(remaining)
    }

    pub fn autophagy_duration(&self, now: DateTime<Utc>) -> Option<Duration> {
        let duration = self.fasting_duration(now)?;
        (duration >= autophagy_threshold()).then(|| duration - autophagy_threshold())
    }
}
