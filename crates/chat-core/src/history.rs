use crate::error::StoreError;
use crate::state::ChatMessage;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Best-effort persistence of a conversation history to a single JSON file.
///
/// `load` and `save` never fail: a missing or corrupt file reads as an empty
/// history and write failures are logged at `warn`. Use `try_load` and
/// `try_save` to observe the failures instead.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Vec<ChatMessage> {
        match self.try_load() {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Could not load conversation history: {}", e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, history: &[ChatMessage]) {
        if let Err(e) = self.try_save(history) {
            tracing::warn!("Could not save conversation history: {}", e);
        }
    }

    /// Reads the history file. A file that does not exist is an empty history.
    pub fn try_load(&self) -> Result<Vec<ChatMessage>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let history: Vec<ChatMessage> =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            messages = history.len(),
            "loaded conversation history"
        );
        Ok(history)
    }

    /// Overwrites the history file with the full sequence.
    pub fn try_save(&self, history: &[ChatMessage]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let content = serde_json::to_string_pretty(history).map_err(StoreError::Serialize)?;
        fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            messages = history.len(),
            "saved conversation history"
        );
        Ok(())
    }
}
