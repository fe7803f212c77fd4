use async_trait::async_trait;

use crate::domain::FastingState;

/// Best-effort propagation of state snapshots to the peer device.
#[async_trait]
pub trait SyncTransport: Send + Sync {
    /// Re-checked before every send; no connection state is kept between
    /// calls.
    fn is_ready(&self) -> bool;

    /// Fire-and-forget, at most once per call. Dropped silently when the
    /// peer is not ready or the write fails; never queued, never retried.
    async fn send(&self, state: &FastingState);
}
