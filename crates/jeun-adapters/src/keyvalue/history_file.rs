use std::path::{Path, PathBuf};

use tracing::debug;

use jeun_core::{FastingSession, HistorySlot, HistoryStorageError};

/// One history slot persisted as a JSON file; two instances with distinct
/// keys model the replicated slot and the local fallback slot.
pub struct FileHistorySlot {
    path: PathBuf,
}

impl FileHistorySlot {
    pub fn new(data_dir: &Path, key: &str) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", key)),
        }
    }
}

impl HistorySlot for FileHistorySlot {
    fn read(&self) -> Result<Option<Vec<FastingSession>>, HistoryStorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(HistoryStorageError::Unavailable {
                    message: error.to_string(),
                })
            }
        };

        match serde_json::from_str(&content) {
            Ok(sessions) => Ok(Some(sessions)),
            Err(error) => {
                debug!(%error, path = %self.path.display(), "corrupt history slot treated as empty");
                Ok(None)
            }
        }
    }

    fn write(&self, sessions: &[FastingSession]) -> Result<(), HistoryStorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| HistoryStorageError::Storage {
                message: error.to_string(),
            })?;
        }

        let content =
            serde_json::to_string(sessions).map_err(|error| HistoryStorageError::Storage {
                message: error.to_string(),
            })?;

        std::fs::write(&self.path, content).map_err(|error| HistoryStorageError::Storage {
            message: error.to_string(),
        })
    }
}
