use std::sync::Mutex;

use jeun_core::{
    FastingSession, FastingState, HistorySlot, HistoryStorageError, StateStorage,
    StateStorageError,
};

/// In-memory `StateStorage` double recording every save.
pub struct MemoryStateStorage {
    state: Mutex<FastingState>,
    save_count: Mutex<usize>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FastingState::default()),
            save_count: Mutex::new(0),
        }
    }

    pub fn with_state(state: FastingState) -> Self {
        Self {
            state: Mutex::new(state),
            save_count: Mutex::new(0),
        }
    }

    pub fn saved(&self) -> FastingState {
        self.state.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }
}

impl Default for MemoryStateStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStorage for MemoryStateStorage {
    fn load(&self) -> FastingState {
        self.state.lock().unwrap().clone()
    }

    fn save(&self, state: &FastingState) -> Result<(), StateStorageError> {
        *self.state.lock().unwrap() = state.clone();
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }
}

/// In-memory `HistorySlot` double; `write_count` lets tests assert that a
/// no-op mutation never touched persistence.
pub struct MemoryHistorySlot {
    sessions: Mutex<Option<Vec<FastingSession>>>,
    write_count: Mutex<usize>,
}

impl MemoryHistorySlot {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(None),
            write_count: Mutex::new(0),
        }
    }

    pub fn with_sessions(sessions: Vec<FastingSession>) -> Self {
        Self {
            sessions: Mutex::new(Some(sessions)),
            write_count: Mutex::new(0),
        }
    }

    pub fn stored(&self) -> Option<Vec<FastingSession>> {
        self.sessions.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        *self.write_count.lock().unwrap()
    }
}

impl Default for MemoryHistorySlot {
    fn default() -> Self {
        Self::new()
    }
}

impl HistorySlot for MemoryHistorySlot {
    fn read(&self) -> Result<Option<Vec<FastingSession>>, HistoryStorageError> {
        Ok(self.sessions.lock().unwrap().clone())
    }

    fn write(&self, sessions: &[FastingSession]) -> Result<(), HistoryStorageError> {
        *self.sessions.lock().unwrap() = Some(sessions.to_vec());
        *self.write_count.lock().unwrap() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    #[test]
    fn state_storage_records_saves() {
        let storage = MemoryStateStorage::new();
        let start: DateTime<Utc> = "2025-03-09T20:00:00Z".parse().unwrap();

        storage.save(&FastingState::fasting(start, None)).unwrap();

        assert!(storage.saved().is_fasting);
        assert_eq!(storage.save_count(), 1);
    }

    #[test]
    fn history_slot_counts_writes() {
        let slot = MemoryHistorySlot::new();
        let ended_at: DateTime<Utc> = "2025-03-10T08:00:00Z".parse().unwrap();
        let session = FastingSession::new(ended_at - Duration::hours(17), ended_at);

        assert!(slot.read().unwrap().is_none());

        slot.write(&[session.clone()]).unwrap();

        assert_eq!(slot.read().unwrap(), Some(vec![session]));
        assert_eq!(slot.write_count(), 1);
    }
}
