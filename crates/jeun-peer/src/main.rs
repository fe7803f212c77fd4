use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use jeun_adapters::{FileHistorySlot, FileStateStorage, TieredHistoryStorage};
use jeun_core::constants::{HISTORY_KEY, LOCAL_HISTORY_KEY};
use jeun_core::format::format_duration_short;
use jeun_core::{Config, HistoryStorage, PeerRole, StateStorage, SyncTransport};
use jeun_runtime::{
    spawn_persistence, spawn_sync_publisher, FastingStoreActor, HistoryStoreActor, StateEvent,
    SyncChannel,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jeun_peer=debug".parse()?))
        .init();

    info!("jeun peer starting");

    let config = Config::load().unwrap_or_else(|error| {
        warn!(%error, "failed to load config, using defaults");
        Config::default()
    });

    let role = resolve_role(&config);
    info!(?role, "peer role resolved");

    let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);
    let sigint_shutdown_sender = shutdown_sender.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("SIGINT received, initiating shutdown");
        sigint_shutdown_sender.send(()).ok();
    });

    let data_dir = config.data_dir();
    if let Err(error) = std::fs::create_dir_all(&data_dir) {
        warn!(%error, "failed to create data directory, saves will be dropped");
    }

    let state_storage: Arc<dyn StateStorage> = Arc::new(FileStateStorage::new(&data_dir));
    let history_storage: Arc<dyn HistoryStorage> = Arc::new(TieredHistoryStorage::new(
        Arc::new(FileHistorySlot::new(&data_dir, HISTORY_KEY)),
        Arc::new(FileHistorySlot::new(&data_dir, LOCAL_HISTORY_KEY)),
    ));

    let (history_actor, history_handle) = HistoryStoreActor::new(history_storage);
    tokio::spawn(history_actor.run());

    let initial_state = state_storage.load();
    info!(
        is_fasting = initial_state.is_fasting,
        "fasting state restored"
    );
    let (store_actor, store_handle) = FastingStoreActor::new(initial_state, Some(history_handle));
    tokio::spawn(store_actor.run());

    let channel = Arc::new(match config.sync.socket_dir.clone() {
        Some(socket_dir) => SyncChannel::with_socket_dir(role, socket_dir),
        None => SyncChannel::new(role),
    });

    spawn_persistence(store_handle.subscribe(), state_storage);
    spawn_sync_publisher(
        store_handle.subscribe(),
        channel.clone() as Arc<dyn SyncTransport>,
    );
    spawn_state_logger(store_handle.subscribe());

    channel.run(store_handle, shutdown_receiver).await?;

    info!("jeun peer stopped");
    std::process::exit(0);
}

fn resolve_role(config: &Config) -> PeerRole {
    match std::env::var("JEUN_ROLE").ok().as_deref() {
        Some("primary") => PeerRole::Primary,
        Some("companion") => PeerRole::Companion,
        Some(other) => {
            warn!(role = other, "unknown JEUN_ROLE, using configured role");
            config.sync.role
        }
        None => config.sync.role,
    }
}

fn spawn_state_logger(mut events: broadcast::Receiver<StateEvent>) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(StateEvent::Changed { state, origin }) => {
                    let last_fast = state
                        .last_duration_seconds
                        .map(|seconds| format_duration_short(chrono::Duration::seconds(seconds)));
                    info!(
                        is_fasting = state.is_fasting,
                        ?origin,
                        ?last_fast,
                        "state changed"
                    );
                }
                Ok(StateEvent::Tick { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
