mod history_file;
mod state_file;
mod tiered;

pub use history_file::FileHistorySlot;
pub use state_file::FileStateStorage;
pub use tiered::TieredHistoryStorage;
