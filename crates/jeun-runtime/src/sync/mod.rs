mod channel;

pub use channel::SyncChannel;
