use jeun_core::{FastingSession, HistorySlot, HistoryStorageError};

/// `HistorySlot` double whose reads and writes always fail, standing in for
/// an unreachable replicated store.
pub struct FailingHistorySlot {
    message: String,
}

impl FailingHistorySlot {
    pub fn unavailable() -> Self {
        Self {
            message: "connection refused".to_string(),
        }
    }

    pub fn with_message(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn error(&self) -> HistoryStorageError {
        HistoryStorageError::Unavailable {
            message: self.message.clone(),
        }
    }
}

impl HistorySlot for FailingHistorySlot {
    fn read(&self) -> Result<Option<Vec<FastingSession>>, HistoryStorageError> {
        Err(self.error())
    }

    fn write(&self, _sessions: &[FastingSession]) -> Result<(), HistoryStorageError> {
        Err(self.error())
    }
}
