use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use interprocess::local_socket::{
    tokio::{prelude::*, Stream},
    GenericFilePath, ListenerOptions,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing::{debug, error, info};

use jeun_core::{FastingState, PeerRole, SyncTransport};
use jeun_protocol::StateEnvelope;

use crate::actors::FastingStoreHandle;

const SEND_TIMEOUT: Duration = Duration::from_secs(2);

/// One endpoint of the device pair. Each role listens on its own socket and
/// pushes snapshots to the opposite role's socket; delivery is best-effort,
/// with no queue and no retry.
pub struct SyncChannel {
    role: PeerRole,
    socket_dir: PathBuf,
}

impl SyncChannel {
    pub fn new(role: PeerRole) -> Self {
        Self {
            role,
            socket_dir: default_socket_dir(),
        }
    }

    pub fn with_socket_dir(role: PeerRole, socket_dir: PathBuf) -> Self {
        Self { role, socket_dir }
    }

    pub fn role(&self) -> PeerRole {
        self.role
    }

    fn own_socket_path(&self) -> PathBuf {
        self.socket_dir.join(self.role.socket_name())
    }

    fn peer_socket_path(&self) -> PathBuf {
        self.socket_dir.join(self.role.peer().socket_name())
    }

    fn cleanup_stale_socket(&self) -> Result<()> {
        if self.own_socket_path().exists() {
            std::fs::remove_file(self.own_socket_path())
                .context("impossible de supprimer l'ancien socket")?;
            debug!("removed stale socket file");
        }
        Ok(())
    }

    /// Accepts peer connections and forwards every decoded snapshot to the
    /// store. Runs until the shutdown signal.
    pub async fn run(
        &self,
        store: FastingStoreHandle,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        self.cleanup_stale_socket()?;

        let listener = ListenerOptions::new()
            .name(
                self.own_socket_path()
                    .as_os_str()
                    .to_fs_name::<GenericFilePath>()?,
            )
            .create_tokio()?;

        info!(
            path = %self.own_socket_path().display(),
            role = ?self.role,
            "sync channel listening"
        );

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok(stream) => {
                            let store = store.clone();
                            tokio::spawn(async move {
                                if let Err(error) = handle_incoming(stream, store).await {
                                    debug!(%error, "sync frame dropped");
                                }
                            });
                        }
                        Err(error) => {
                            error!(%error, "failed to accept sync connection");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("sync channel shutting down");
                    break;
                }
            }
        }

        self.cleanup_socket();
        Ok(())
    }

    fn cleanup_socket(&self) {
        if let Err(error) = std::fs::remove_file(self.own_socket_path()) {
            debug!(%error, "socket file already removed");
        } else {
            debug!("socket file cleaned up");
        }
    }

    async fn transmit(&self, envelope: &StateEnvelope) -> Result<()> {
        let peer_socket_path = self.peer_socket_path();
        let name = peer_socket_path
            .as_os_str()
            .to_fs_name::<GenericFilePath>()?;

        let mut stream = timeout(SEND_TIMEOUT, Stream::connect(name))
            .await
            .context("délai de connexion au pair dépassé")??;

        let payload = bincode::serialize(envelope)?;
        let payload_length = (payload.len() as u32).to_le_bytes();

        let write_future = async {
            stream.write_all(&payload_length).await?;
            stream.write_all(&payload).await?;
            stream.flush().await?;
            Ok::<_, std::io::Error>(())
        };

        timeout(SEND_TIMEOUT, write_future)
            .await
            .context("délai d'envoi dépassé")??;

        Ok(())
    }
}

#[async_trait]
impl SyncTransport for SyncChannel {
    fn is_ready(&self) -> bool {
        self.peer_socket_path().exists()
    }

    async fn send(&self, state: &FastingState) {
        if !self.is_ready() {
            debug!("peer not ready, snapshot dropped");
            return;
        }

        let Some(envelope) = StateEnvelope::encode(state) else {
            debug!("snapshot failed to encode, dropped");
            return;
        };

        if let Err(error) = self.transmit(&envelope).await {
            debug!(%error, "snapshot send failed, dropped");
        }
    }
}

async fn handle_incoming(mut stream: Stream, store: FastingStoreHandle) -> Result<()> {
    let mut length_buffer = [0u8; 4];
    stream.read_exact(&mut length_buffer).await?;
    let length = u32::from_le_bytes(length_buffer) as usize;

    let mut payload = vec![0u8; length];
    stream.read_exact(&mut payload).await?;

    let envelope: StateEnvelope =
        bincode::deserialize(&payload).context("failed to deserialize sync envelope")?;

    let Some(state) = envelope.decode() else {
        debug!("undecodable snapshot ignored");
        return Ok(());
    };

    debug!(is_fasting = state.is_fasting, "remote snapshot received");

    store.apply_remote(state).await.ok();
    Ok(())
}

fn default_socket_dir() -> PathBuf {
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/run/user/{}", uid))
}
