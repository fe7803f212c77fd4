use super::FastingSession;

/// Aggregates over the session history, recomputed from scratch on every
/// call; nothing here is cached across mutations.
#[derive(Debug, Clone, Default)]
pub struct HistoryStats {
    pub total_fasts: usize,
    pub total_fasting_seconds: i64,
    pub total_autophagy_seconds: i64,
    pub average_fast_seconds: Option<i64>,
    pub longest_fast: Option<FastingSession>,
    pub autophagy_success_rate: f64,
}

impl HistoryStats {
    pub fn compute(sessions: &[FastingSession]) -> Self {
        let total_fasts = sessions.len();
        let total_fasting_seconds: i64 = sessions
            .iter()
            .map(|session| session.duration().num_seconds())
            .sum();
        let total_autophagy_seconds: i64 = sessions
            .iter()
            .filter_map(|session| session.autophagy_duration())
            .map(|duration| duration.num_seconds())
            .sum();

        let average_fast_seconds =
            (total_fasts > 0).then(|| total_fasting_seconds / total_fasts as i64);

        // ties keep the first session encountered
        let longest_fast = sessions
            .iter()
            .fold(None::<&FastingSession>, |best, session| match best {
                Some(current) if session.duration() > current.duration() => Some(session),
                None => Some(session),
                _ => best,
            })
            .cloned();

        let reached = sessions
            .iter()
            .filter(|session| session.reached_autophagy())
            .count();
        // empty history rates 0, it is not an absence of a value
        let autophagy_success_rate = if total_fasts == 0 {
            0.0
        } else {
            reached as f64 / total_fasts as f64
        };

        Self {
            total_fasts,
            total_fasting_seconds,
            total_autophagy_seconds,
            average_fast_seconds,
            longest_fast,
            autophagy_success_rate,
        }
    }
}
