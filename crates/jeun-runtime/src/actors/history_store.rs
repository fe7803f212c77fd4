use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};
use uuid::Uuid;

use jeun_core::{FastingSession, HistoryStats, HistoryStorage};

pub enum HistoryMessage {
    Add {
        session: FastingSession,
    },
    Delete {
        id: Uuid,
    },
    DeleteAt {
        indices: Vec<usize>,
    },
    GetSessions {
        reply: oneshot::Sender<Vec<FastingSession>>,
    },
    GetStats {
        reply: oneshot::Sender<HistoryStats>,
    },
    Reload,
}

pub struct HistoryStoreActor {
    receiver: mpsc::Receiver<HistoryMessage>,
    sessions: Vec<FastingSession>,
    storage: Arc<dyn HistoryStorage>,
}

#[derive(Clone)]
pub struct HistoryStoreHandle {
    sender: mpsc::Sender<HistoryMessage>,
}

impl HistoryStoreHandle {
    /// Fire-and-forget append, so stopping a fast never waits on history
    /// plumbing.
    pub fn add(&self, session: FastingSession) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            if let Err(error) = sender.send(HistoryMessage::Add { session }).await {
                error!(%error, "failed to send session to history store");
            }
        });
    }

    pub async fn delete(
        &self,
        id: Uuid,
    ) -> Result<(), mpsc::error::SendError<HistoryMessage>> {
        self.sender.send(HistoryMessage::Delete { id }).await
    }

    pub async fn delete_at(
        &self,
        indices: Vec<usize>,
    ) -> Result<(), mpsc::error::SendError<HistoryMessage>> {
        self.sender.send(HistoryMessage::DeleteAt { indices }).await
    }

    pub async fn sessions(&self) -> Option<Vec<FastingSession>> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(HistoryMessage::GetSessions {
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }

    pub async fn stats(&self) -> Option<HistoryStats> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(HistoryMessage::GetStats {
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }

    /// Ingress for external-change notifications on the replicated slot.
    pub async fn reload(&self) -> Result<(), mpsc::error::SendError<HistoryMessage>> {
        self.sender.send(HistoryMessage::Reload).await
    }
}

impl HistoryStoreActor {
    pub fn new(storage: Arc<dyn HistoryStorage>) -> (Self, HistoryStoreHandle) {
        let (sender, receiver) = mpsc::channel(32);

        let sessions = storage.load();
        info!(count = sessions.len(), "session history loaded");

        let actor = Self {
            receiver,
            sessions,
            storage,
        };

        let handle = HistoryStoreHandle { sender };

        (actor, handle)
    }

    pub async fn run(mut self) {
        while let Some(message) = self.receiver.recv().await {
            match message {
                HistoryMessage::Add { session } => self.add(session),
                HistoryMessage::Delete { id } => self.delete(id),
                HistoryMessage::DeleteAt { indices } => self.delete_at(indices),
                HistoryMessage::GetSessions { reply } => {
                    let _ = reply.send(self.sessions.clone());
                }
                HistoryMessage::GetStats { reply } => {
                    let _ = reply.send(HistoryStats::compute(&self.sessions));
                }
                HistoryMessage::Reload => self.reload(),
            }
        }

        debug!("history store actor stopped");
    }

    fn add(&mut self, session: FastingSession) {
        info!(
            duration_seconds = session.duration().num_seconds(),
            reached_autophagy = session.reached_autophagy(),
            "session recorded"
        );
        self.sessions.insert(0, session);
        self.persist();
    }

    fn delete(&mut self, id: Uuid) {
        let before = self.sessions.len();
        self.sessions.retain(|session| session.id != id);

        if self.sessions.len() == before {
            debug!(%id, "delete ignored, unknown session");
            return;
        }

        self.persist();
    }

    fn delete_at(&mut self, mut indices: Vec<usize>) {
        indices.sort_unstable();
        indices.dedup();

        for index in indices.into_iter().rev() {
            if index < self.sessions.len() {
                self.sessions.remove(index);
            }
        }

        self.persist();
    }

    fn reload(&mut self) {
        self.sessions = self.storage.load();
        debug!(count = self.sessions.len(), "session history reloaded");
    }

    fn persist(&self) {
        if let Err(error) = self.storage.save(&self.sessions) {
            error!(%error, "failed to persist session history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use jeun_adapters::{MemoryHistorySlot, TieredHistoryStorage};
    use jeun_core::HistorySlot;

    fn session(hours: i64) -> FastingSession {
        let ended_at: DateTime<Utc> = "2025-03-10T08:00:00Z".parse().unwrap();
        FastingSession::new(ended_at - Duration::hours(hours), ended_at)
    }

    fn spawn_store(
        replicated: Arc<MemoryHistorySlot>,
        local: Arc<MemoryHistorySlot>,
    ) -> HistoryStoreHandle {
        let storage = Arc::new(TieredHistoryStorage::new(replicated, local));
        let (actor, handle) = HistoryStoreActor::new(storage);
        tokio::spawn(actor.run());
        handle
    }

    #[tokio::test]
    async fn added_sessions_come_back_newest_first() {
        let handle = spawn_store(
            Arc::new(MemoryHistorySlot::new()),
            Arc::new(MemoryHistorySlot::new()),
        );

        let older = session(17);
        let newer = session(12);
        handle.add(older.clone());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        handle.add(newer.clone());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let sessions = handle.sessions().await.unwrap();
        assert_eq!(sessions, vec![newer, older]);
    }

    #[tokio::test]
    async fn add_persists_to_both_tiers() {
        let replicated = Arc::new(MemoryHistorySlot::new());
        let local = Arc::new(MemoryHistorySlot::new());
        let handle = spawn_store(replicated.clone(), local.clone());

        let recorded = session(17);
        handle.add(recorded.clone());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(replicated.stored(), Some(vec![recorded.clone()]));
        assert_eq!(local.stored(), Some(vec![recorded]));
    }

    #[tokio::test]
    async fn delete_removes_matching_session() {
        let handle = spawn_store(
            Arc::new(MemoryHistorySlot::new()),
            Arc::new(MemoryHistorySlot::new()),
        );

        let keep = session(18);
        let drop = session(10);
        handle.add(keep.clone());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        handle.add(drop.clone());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        handle.delete(drop.id).await.unwrap();

        let sessions = handle.sessions().await.unwrap();
        assert_eq!(sessions, vec![keep]);
    }

    #[tokio::test]
    async fn deleting_unknown_id_changes_nothing_and_skips_persistence() {
        let replicated = Arc::new(MemoryHistorySlot::new());
        let handle = spawn_store(replicated.clone(), Arc::new(MemoryHistorySlot::new()));

        let recorded = session(17);
        handle.add(recorded.clone());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let writes_after_add = replicated.write_count();

        handle.delete(Uuid::new_v4()).await.unwrap();

        let sessions = handle.sessions().await.unwrap();
        assert_eq!(sessions, vec![recorded]);
        assert_eq!(replicated.write_count(), writes_after_add);
    }

    #[tokio::test]
    async fn delete_at_removes_index_set() {
        let handle = spawn_store(
            Arc::new(MemoryHistorySlot::new()),
            Arc::new(MemoryHistorySlot::new()),
        );

        let third = session(10);
        let second = session(12);
        let first = session(17);
        for entry in [third.clone(), second.clone(), first.clone()] {
            handle.add(entry);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        handle.delete_at(vec![0, 2, 99]).await.unwrap();

        let sessions = handle.sessions().await.unwrap();
        assert_eq!(sessions, vec![second]);
    }

    #[tokio::test]
    async fn stats_reflect_current_collection() {
        let handle = spawn_store(
            Arc::new(MemoryHistorySlot::new()),
            Arc::new(MemoryHistorySlot::new()),
        );

        for hours in [15, 17, 20] {
            handle.add(session(hours));
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        let stats = handle.stats().await.unwrap();
        assert_eq!(stats.total_fasts, 3);
        assert_eq!(stats.total_autophagy_seconds, 5 * 3600);
        assert!((stats.autophagy_success_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn reload_picks_up_external_replicated_changes() {
        let replicated = Arc::new(MemoryHistorySlot::new());
        let handle = spawn_store(replicated.clone(), Arc::new(MemoryHistorySlot::new()));

        assert!(handle.sessions().await.unwrap().is_empty());

        let external = session(19);
        replicated.write(&[external.clone()]).unwrap();
        handle.reload().await.unwrap();

        let sessions = handle.sessions().await.unwrap();
        assert_eq!(sessions, vec![external]);
    }

    #[tokio::test]
    async fn loads_existing_history_at_construction() {
        let seeded = session(16);
        let replicated = Arc::new(MemoryHistorySlot::with_sessions(vec![seeded.clone()]));
        let handle = spawn_store(replicated, Arc::new(MemoryHistorySlot::new()));

        let sessions = handle.sessions().await.unwrap();
        assert_eq!(sessions, vec![seeded]);
    }
}
