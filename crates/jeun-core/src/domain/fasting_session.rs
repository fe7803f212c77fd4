use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::autophagy_threshold;

pub type SessionId = Uuid;

/// A completed fast. Created once when a fast is stopped, immutable after,
/// removed only by explicit user deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastingSession {
    pub id: SessionId,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl FastingSession {
    pub fn new(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            ended_at,
        }
    }

    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    pub fn reached_autophagy(&self) -> bool {
        self.duration() >= autophagy_threshold()
    }

    pub fn autophagy_duration(&self) -> Option<Duration> {
        self.reached_autophagy()
            .then(|| self.duration() - autophagy_threshold())
    }
}
