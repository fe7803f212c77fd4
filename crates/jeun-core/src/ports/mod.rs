mod history_storage;
mod state_storage;
mod sync_transport;

pub use history_storage::{HistorySlot, HistoryStorage, HistoryStorageError};
pub use state_storage::{StateStorage, StateStorageError};
pub use sync_transport::SyncTransport;
