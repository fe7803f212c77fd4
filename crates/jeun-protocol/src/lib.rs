//! Jeun sync wire format
//!
//! Defines the envelope exchanged between the two device peers. All types
//! are serializable with bincode for efficient binary communication. The
//! envelope carries the serialized state in a single field; both peers must
//! agree on the encoding, there is no version field and no negotiation.

use serde::{Deserialize, Serialize};

use jeun_core::FastingState;

/// One full state snapshot on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEnvelope {
    /// Serialized `FastingState` bytes.
    pub state: Vec<u8>,
}

impl StateEnvelope {
    /// `None` when the state cannot be serialized; the caller drops the send.
    pub fn encode(state: &FastingState) -> Option<Self> {
        bincode::serialize(state).ok().map(|state| Self { state })
    }

    /// `None` when the carried bytes do not decode; the caller drops the
    /// frame without touching local state.
    pub fn decode(&self) -> Option<FastingState> {
        bincode::deserialize(&self.state).ok()
    }
}
