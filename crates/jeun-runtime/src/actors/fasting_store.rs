use std::time::Duration as TickDuration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use jeun_core::{FastingSession, FastingState};

use super::HistoryStoreHandle;

pub enum StoreMessage {
    Start {
        at: Option<DateTime<Utc>>,
    },
    Stop {
        at: Option<DateTime<Utc>>,
    },
    Toggle,
    ApplyRemote {
        state: FastingState,
    },
    GetState {
        reply: oneshot::Sender<FastingState>,
    },
    GetStatus {
        reply: oneshot::Sender<StoreStatus>,
    },
}

/// Where a state change came from. The sync publisher forwards local
/// changes only, so a remote update is never echoed back to its sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    Local,
    Remote,
}

#[derive(Debug, Clone)]
pub enum StateEvent {
    Changed {
        state: FastingState,
        origin: ChangeOrigin,
    },
    /// Republished once per second while a fast is running; the elapsed
    /// value is clamped to zero for display.
    Tick {
        elapsed_seconds: i64,
    },
}

#[derive(Debug, Clone)]
pub struct StoreStatus {
    pub fasting: bool,
    pub elapsed_seconds: Option<i64>,
    pub autophagy_started: bool,
    pub seconds_until_autophagy: Option<i64>,
}

pub struct FastingStoreActor {
    receiver: mpsc::Receiver<StoreMessage>,
    state: FastingState,
    history: Option<HistoryStoreHandle>,
    events: broadcast::Sender<StateEvent>,
}

#[derive(Clone)]
pub struct FastingStoreHandle {
    sender: mpsc::Sender<StoreMessage>,
    events: broadcast::Sender<StateEvent>,
}

impl FastingStoreHandle {
    pub async fn start(
        &self,
        at: Option<DateTime<Utc>>,
    ) -> Result<(), mpsc::error::SendError<StoreMessage>> {
        self.sender.send(StoreMessage::Start { at }).await
    }

    pub async fn stop(
        &self,
        at: Option<DateTime<Utc>>,
    ) -> Result<(), mpsc::error::SendError<StoreMessage>> {
        self.sender.send(StoreMessage::Stop { at }).await
    }

    pub async fn toggle(&self) -> Result<(), mpsc::error::SendError<StoreMessage>> {
        self.sender.send(StoreMessage::Toggle).await
    }

    /// Sync ingress: the remote snapshot fully replaces local state,
    /// whichever of the two is older.
    pub async fn apply_remote(
        &self,
        state: FastingState,
    ) -> Result<(), mpsc::error::SendError<StoreMessage>> {
        self.sender.send(StoreMessage::ApplyRemote { state }).await
    }

    pub async fn state(&self) -> Option<FastingState> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(StoreMessage::GetState {
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }

    pub async fn status(&self) -> Option<StoreStatus> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(StoreMessage::GetStatus {
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }
}

impl FastingStoreActor {
    pub fn new(
        initial: FastingState,
        history: Option<HistoryStoreHandle>,
    ) -> (Self, FastingStoreHandle) {
        let (sender, receiver) = mpsc::channel(32);
        let (events, _) = broadcast::channel(32);

        let actor = Self {
            receiver,
            state: initial,
            history,
            events: events.clone(),
        };

        let handle = FastingStoreHandle { sender, events };

        (actor, handle)
    }

    pub async fn run(mut self) {
        // single loop owns both the mailbox and the tick, so a fresh fast
        // can never race a leftover timer
        let mut tick_interval = tokio::time::interval(TickDuration::from_secs(1));

        loop {
            tokio::select! {
                Some(message) = self.receiver.recv() => {
                    match message {
                        StoreMessage::Start { at } => {
                            self.start(at.unwrap_or_else(Utc::now));
                        }
                        StoreMessage::Stop { at } => {
                            self.stop(at.unwrap_or_else(Utc::now));
                        }
                        StoreMessage::Toggle => {
                            if self.state.is_fasting {
                                self.stop(Utc::now());
                            } else {
                                self.start(Utc::now());
                            }
                        }
                        StoreMessage::ApplyRemote { state } => {
                            self.apply_remote(state);
                        }
                        StoreMessage::GetState { reply } => {
                            let _ = reply.send(self.state.clone());
                        }
                        StoreMessage::GetStatus { reply } => {
                            let _ = reply.send(self.current_status());
                        }
                    }
                }
                _ = tick_interval.tick() => {
                    if self.state.is_fasting {
                        if let Some(elapsed) = self.state.fasting_duration(Utc::now()) {
                            let _ = self.events.send(StateEvent::Tick {
                                elapsed_seconds: elapsed.num_seconds().max(0),
                            });
                        }
                    }
                }
                else => break,
            }
        }

        debug!("fasting store actor stopped");
    }

    fn start(&mut self, at: DateTime<Utc>) {
        info!(started_at = %at, "fast started");

        self.state = FastingState::fasting(at, self.state.last_duration_seconds);
        self.publish_change(ChangeOrigin::Local);
    }

    fn stop(&mut self, at: DateTime<Utc>) {
        let started_at = match self.state.started_at {
            Some(started_at) if self.state.is_fasting => started_at,
            _ => {
                debug!("stop ignored, no fast in progress");
                return;
            }
        };

        let session = FastingSession::new(started_at, at);
        let duration_seconds = session.duration().num_seconds();
        info!(
            duration_seconds,
            reached_autophagy = session.reached_autophagy(),
            "fast stopped"
        );

        if let Some(ref history) = self.history {
            history.add(session);
        }

        self.state = FastingState::idle(Some(duration_seconds));
        self.publish_change(ChangeOrigin::Local);
    }

    fn apply_remote(&mut self, state: FastingState) {
        debug!(is_fasting = state.is_fasting, "remote state applied");

        self.state = state;
        self.publish_change(ChangeOrigin::Remote);
    }

    fn publish_change(&self, origin: ChangeOrigin) {
        let _ = self.events.send(StateEvent::Changed {
            state: self.state.clone(),
            origin,
        });
    }

    fn current_status(&self) -> StoreStatus {
        let now = Utc::now();
        StoreStatus {
            fasting: self.state.is_fasting,
            elapsed_seconds: self
                .state
                .fasting_duration(now)
                .map(|duration| duration.num_seconds()),
            autophagy_started: self.state.autophagy_started(now),
            seconds_until_autophagy: self
                .state
                .time_until_autophagy(now)
                .map(|duration| duration.num_seconds()),
        }
    }
}
