mod fasting_session;
mod fasting_state;
mod history_stats;

pub use fasting_session::{FastingSession, SessionId};
pub use fasting_state::FastingState;
pub use history_stats::HistoryStats;
