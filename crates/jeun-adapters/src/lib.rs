//! Jeun adapters - Infrastructure implementations
//!
//! This crate contains concrete implementations of the ports defined in
//! jeun-core: file-backed key-value storage for the fasting state and the
//! session history, plus in-memory doubles for tests.

pub mod keyvalue;
pub mod testing;

pub use keyvalue::{FileHistorySlot, FileStateStorage, TieredHistoryStorage};
pub use testing::{FailingHistorySlot, MemoryHistorySlot, MemoryStateStorage, RecordingTransport};
