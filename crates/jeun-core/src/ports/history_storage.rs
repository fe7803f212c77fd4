use thiserror::Error;

use crate::domain::FastingSession;

#[derive(Error, Debug)]
pub enum HistoryStorageError {
    #[error("emplacement de stockage indisponible: {message}")]
    Unavailable { message: String },

    #[error("erreur de persistence: {message}")]
    Storage { message: String },
}

/// One key-value slot holding the full serialized session list.
pub trait HistorySlot: Send + Sync {
    /// `Ok(None)` when the slot is empty or holds undecodable bytes.
    fn read(&self) -> Result<Option<Vec<FastingSession>>, HistoryStorageError>;

    fn write(&self, sessions: &[FastingSession]) -> Result<(), HistoryStorageError>;
}

/// Layered session-list storage: a replicated slot backed by a device-local
/// fallback.
pub trait HistoryStorage: Send + Sync {
    /// Both tiers missing or unreadable yields an empty history.
    fn load(&self) -> Vec<FastingSession>;

    fn save(&self, sessions: &[FastingSession]) -> Result<(), HistoryStorageError>;
}
