mod fasting_store;
mod history_store;

pub use fasting_store::{
    ChangeOrigin, FastingStoreActor, FastingStoreHandle, StateEvent, StoreMessage, StoreStatus,
};
pub use history_store::{HistoryMessage, HistoryStoreActor, HistoryStoreHandle};
