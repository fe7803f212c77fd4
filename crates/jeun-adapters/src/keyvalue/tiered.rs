use std::sync::Arc;

use tracing::{debug, warn};

use jeun_core::{FastingSession, HistorySlot, HistoryStorage, HistoryStorageError};

/// Read-through/write-through pair of slots: the replicated slot is
/// authoritative, the local slot is the offline fallback. Reads repair
/// whichever tier was missing; writes go to both.
pub struct TieredHistoryStorage {
    replicated: Arc<dyn HistorySlot>,
    local: Arc<dyn HistorySlot>,
}

impl TieredHistoryStorage {
    pub fn new(replicated: Arc<dyn HistorySlot>, local: Arc<dyn HistorySlot>) -> Self {
        Self { replicated, local }
    }
}

impl HistoryStorage for TieredHistoryStorage {
    fn load(&self) -> Vec<FastingSession> {
        match self.replicated.read() {
            Ok(Some(mut sessions)) => {
                sort_newest_first(&mut sessions);
                if let Err(error) = self.local.write(&sessions) {
                    warn!(%error, "failed to mirror history into local slot");
                }
                return sessions;
            }
            Ok(None) => debug!("replicated history slot empty"),
            Err(error) => warn!(%error, "replicated history slot unreadable"),
        }

        match self.local.read() {
            Ok(Some(mut sessions)) => {
                sort_newest_first(&mut sessions);
                if let Err(error) = self.replicated.write(&sessions) {
                    debug!(%error, "failed to push local history back to replicated slot");
                }
                sessions
            }
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, "local history slot unreadable");
                Vec::new()
            }
        }
    }

    fn save(&self, sessions: &[FastingSession]) -> Result<(), HistoryStorageError> {
        let replicated = self.replicated.write(sessions);
        if let Err(ref error) = replicated {
            warn!(%error, "replicated history write failed");
        }

        let local = self.local.write(sessions);
        if let Err(ref error) = local {
            warn!(%error, "local history write failed");
        }

        // a write is durable as long as one tier accepted it
        match (replicated, local) {
            (Err(error), Err(_)) => Err(error),
            _ => Ok(()),
        }
    }
}

fn sort_newest_first(sessions: &mut [FastingSession]) {
    sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingHistorySlot, MemoryHistorySlot};
    use chrono::{DateTime, Duration, Utc};

    fn session_ending(hours_ago: i64, length_hours: i64) -> FastingSession {
        let base: DateTime<Utc> = "2025-03-10T08:00:00Z".parse().unwrap();
        let ended_at = base - Duration::hours(hours_ago);
        FastingSession::new(ended_at - Duration::hours(length_hours), ended_at)
    }

    #[test]
    fn replicated_slot_wins_and_mirrors_to_local() {
        let sessions = vec![session_ending(1, 17)];
        let replicated = Arc::new(MemoryHistorySlot::with_sessions(sessions.clone()));
        let local = Arc::new(MemoryHistorySlot::new());
        let storage = TieredHistoryStorage::new(replicated, local.clone());

        let loaded = storage.load();

        assert_eq!(loaded, sessions);
        assert_eq!(local.stored(), Some(sessions));
    }

    #[test]
    fn empty_replicated_falls_back_to_local_and_repairs() {
        let sessions = vec![session_ending(2, 18)];
        let replicated = Arc::new(MemoryHistorySlot::new());
        let local = Arc::new(MemoryHistorySlot::with_sessions(sessions.clone()));
        let storage = TieredHistoryStorage::new(replicated.clone(), local);

        let loaded = storage.load();

        assert_eq!(loaded, sessions);
        assert_eq!(replicated.stored(), Some(sessions));
    }

    #[test]
    fn both_slots_empty_loads_empty_history() {
        let storage = TieredHistoryStorage::new(
            Arc::new(MemoryHistorySlot::new()),
            Arc::new(MemoryHistorySlot::new()),
        );

        assert!(storage.load().is_empty());
    }

    #[test]
    fn load_sorts_newest_first() {
        let older = session_ending(48, 16);
        let newer = session_ending(1, 12);
        let replicated = Arc::new(MemoryHistorySlot::with_sessions(vec![
            older.clone(),
            newer.clone(),
        ]));
        let storage = TieredHistoryStorage::new(replicated, Arc::new(MemoryHistorySlot::new()));

        let loaded = storage.load();

        assert_eq!(loaded, vec![newer, older]);
    }

    #[test]
    fn save_writes_both_tiers() {
        let replicated = Arc::new(MemoryHistorySlot::new());
        let local = Arc::new(MemoryHistorySlot::new());
        let storage = TieredHistoryStorage::new(replicated.clone(), local.clone());
        let sessions = vec![session_ending(1, 17)];

        storage.save(&sessions).unwrap();

        assert_eq!(replicated.stored(), Some(sessions.clone()));
        assert_eq!(local.stored(), Some(sessions));
    }

    #[test]
    fn save_survives_replicated_tier_failure() {
        let local = Arc::new(MemoryHistorySlot::new());
        let storage =
            TieredHistoryStorage::new(Arc::new(FailingHistorySlot::unavailable()), local.clone());
        let sessions = vec![session_ending(1, 17)];

        storage.save(&sessions).unwrap();

        assert_eq!(local.stored(), Some(sessions));
    }

    #[test]
    fn save_fails_only_when_both_tiers_fail() {
        let storage = TieredHistoryStorage::new(
            Arc::new(FailingHistorySlot::unavailable()),
            Arc::new(FailingHistorySlot::unavailable()),
        );

        assert!(storage.save(&[session_ending(1, 17)]).is_err());
    }

    #[test]
    fn unreadable_replicated_falls_back_to_local() {
        let sessions = vec![session_ending(3, 19)];
        let local = Arc::new(MemoryHistorySlot::with_sessions(sessions.clone()));
        let storage = TieredHistoryStorage::new(Arc::new(FailingHistorySlot::unavailable()), local);

        assert_eq!(storage.load(), sessions);
    }
}
