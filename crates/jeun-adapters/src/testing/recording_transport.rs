use std::sync::Mutex;

use async_trait::async_trait;

use jeun_core::{FastingState, SyncTransport};

/// `SyncTransport` double: records snapshots while "ready", drops them
/// silently otherwise, mimicking the real channel's readiness gate.
pub struct RecordingTransport {
    ready: Mutex<bool>,
    sent: Mutex<Vec<FastingState>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            ready: Mutex::new(true),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn unready() -> Self {
        Self {
            ready: Mutex::new(false),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        *self.ready.lock().unwrap() = ready;
    }

    pub fn sent(&self) -> Vec<FastingState> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncTransport for RecordingTransport {
    fn is_ready(&self) -> bool {
        *self.ready.lock().unwrap()
    }

    async fn send(&self, state: &FastingState) {
        if !self.is_ready() {
            return;
        }
        self.sent.lock().unwrap().push(state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sends_while_ready() {
        let transport = RecordingTransport::new();

        transport.send(&FastingState::idle(None)).await;

        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn drops_sends_while_unready() {
        let transport = RecordingTransport::unready();

        transport.send(&FastingState::idle(None)).await;

        assert!(transport.sent().is_empty());

        transport.set_ready(true);
        transport.send(&FastingState::idle(None)).await;

        assert_eq!(transport.sent().len(), 1);
    }
}
