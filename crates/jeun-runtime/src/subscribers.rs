use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use jeun_core::{StateStorage, SyncTransport};

use crate::actors::{ChangeOrigin, StateEvent};

/// Writes every state change (local or remote origin) through the storage
/// port. Runs until the event stream closes.
pub fn spawn_persistence(
    mut events: broadcast::Receiver<StateEvent>,
    storage: Arc<dyn StateStorage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(StateEvent::Changed { state, .. }) => {
                    if let Err(error) = storage.save(&state) {
                        error!(%error, "failed to persist fasting state");
                    }
                }
                Ok(StateEvent::Tick { .. }) => {}
                // last-write-wins: missed intermediate states are covered
                // by the next change
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "persistence subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        debug!("persistence subscriber stopped");
    })
}

/// Pushes local-origin changes to the peer device. Remote-origin changes
/// are persisted elsewhere but never echoed back.
pub fn spawn_sync_publisher(
    mut events: broadcast::Receiver<StateEvent>,
    transport: Arc<dyn SyncTransport>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(StateEvent::Changed {
                    state,
                    origin: ChangeOrigin::Local,
                }) => {
                    transport.send(&state).await;
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "sync publisher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        debug!("sync publisher stopped");
    })
}
