use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, error, info, warn};

use super::state::{CounterRepair, TodoState};
use super::Persister;
use crate::errors::ServiceError;

/// JSON file backing for the todo state.
///
/// Snapshots are written pretty-printed to a sibling `<file>.tmp` and then
/// renamed over the real file, so readers never observe a half-written file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
    tmp_path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let file_path = path.into();
        let mut tmp = file_path.clone().into_os_string();
        tmp.push(".tmp");
        Self { file_path, tmp_path: PathBuf::from(tmp) }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read the state from disk. Never fails.
    ///
    /// A missing file is created with the empty state. An unreadable or corrupt
    /// file is logged and replaced in memory by the empty state; the file itself
    /// is left untouched until the next successful persist.
    pub async fn load(&self) -> TodoState {
        match self.try_load().await {
            Ok(mut state) => {
                let stored = state.next_id;
                match state.repair_counter() {
                    CounterRepair::Intact => {}
                    CounterRepair::Raised => warn!(
                        path = %self.file_path.display(),
                        stored,
                        next_id = state.next_id,
                        "next_id behind stored ids; raised"
                    ),
                    CounterRepair::Exhausted => error!(
                        path = %self.file_path.display(),
                        stored,
                        "stored id reaches i64::MAX; creates will fail"
                    ),
                }
                state
            }
            Err(e) => {
                error!(path = %self.file_path.display(), error = %e, "failed to read store file; starting empty");
                TodoState::default()
            }
        }
    }

    async fn try_load(&self) -> Result<TodoState, ServiceError> {
        ensure_parent(&self.file_path).await?;
        match fs::read(&self.file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(ServiceError::persistence),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let initial = TodoState::default();
                self.write_snapshot(&initial).await?;
                info!(path = %self.file_path.display(), "store file created");
                Ok(initial)
            }
            Err(e) => Err(ServiceError::persistence(e)),
        }
    }

    async fn write_snapshot(&self, state: &TodoState) -> Result<(), ServiceError> {
        ensure_parent(&self.file_path).await?;
        let data = serde_json::to_vec_pretty(state).map_err(ServiceError::persistence)?;
        fs::write(&self.tmp_path, data).await.map_err(ServiceError::persistence)?;
        if let Err(e) = fs::rename(&self.tmp_path, &self.file_path).await {
            let _ = fs::remove_file(&self.tmp_path).await;
            return Err(ServiceError::persistence(e));
        }
        debug!(path = %self.file_path.display(), records = state.records.len(), "store persisted");
        Ok(())
    }
}

#[async_trait]
impl Persister for JsonFileStore {
    async fn persist(&self, state: &TodoState) -> Result<(), ServiceError> {
        self.write_snapshot(state).await
    }
}

async fn ensure_parent(path: &Path) -> Result<(), ServiceError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await.map_err(ServiceError::persistence)
        }
        _ => Ok(()),
    }
}
