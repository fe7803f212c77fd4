//! Jeun core library
//!
//! Contains domain types and port definitions (traits) for the Jeun fasting
//! tracker. This crate has no knowledge of infrastructure concerns.

pub mod config;
pub mod constants;
pub mod domain;
pub mod format;
pub mod ports;

pub use config::{Config, ConfigError, PeerRole, StorageConfig, SyncConfig};
pub use domain::{FastingSession, FastingState, HistoryStats, SessionId};
pub use ports::{
    HistorySlot, HistoryStorage, HistoryStorageError, StateStorage, StateStorageError,
    SyncTransport,
};
