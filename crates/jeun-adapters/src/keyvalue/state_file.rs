use std::path::{Path, PathBuf};

use jeun_core::constants::FASTING_STATE_KEY;
use jeun_core::{FastingState, StateStorage, StateStorageError};

/// Stores the current state as JSON in a single well-known file, readable
/// by every process on the device.
pub struct FileStateStorage {
    path: PathBuf,
}

impl FileStateStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", FASTING_STATE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for FileStateStorage {
    fn load(&self) -> FastingState {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn save(&self, state: &FastingState) -> Result<(), StateStorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| StateStorageError::Storage {
                message: error.to_string(),
            })?;
        }

        let content = serde_json::to_string(state).map_err(|error| StateStorageError::Storage {
            message: error.to_string(),
        })?;

        std::fs::write(&self.path, content).map_err(|error| StateStorageError::Storage {
            message: error.to_string(),
        })
    }
}
