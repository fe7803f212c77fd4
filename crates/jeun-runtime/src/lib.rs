//! Jeun runtime
//!
//! Hosts the two store actors, their side-effect subscribers and the
//! cross-device sync channel. Each store's state is owned by a single tokio
//! task and mutated only there; consumers talk to it through a cloneable
//! handle.

pub mod actors;
pub mod subscribers;
pub mod sync;

pub use actors::{
    ChangeOrigin, FastingStoreActor, FastingStoreHandle, HistoryStoreActor, HistoryStoreHandle,
    StateEvent, StoreStatus,
};
pub use subscribers::{spawn_persistence, spawn_sync_publisher};
pub use sync::SyncChannel;
