mod failing_storage;
mod memory_storage;
mod recording_transport;

pub use failing_storage::FailingHistorySlot;
pub use memory_storage::{MemoryHistorySlot, MemoryStateStorage};
pub use recording_transport::RecordingTransport;
