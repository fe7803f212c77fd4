use thiserror::Error;

use crate::domain::FastingState;

#[derive(Error, Debug)]
pub enum StateStorageError {
    #[error("erreur de persistence: {message}")]
    Storage { message: String },
}

/// Single-key storage for the current fasting state, shared by every
/// process on the device.
pub trait StateStorage: Send + Sync {
    /// Absent or corrupt bytes yield the default state, never an error.
    fn load(&self) -> FastingState;

    fn save(&self, state: &FastingState) -> Result<(), StateStorageError>;
}
