//! Storage for the todo collection.
//!
//! `TodoStore` owns the live state behind an async mutex together with the
//! `Persister` that flushes it. Callers lock, mutate the state in place and
//! call `StateGuard::persist` before releasing the lock, so a request's
//! read-modify-write-persist never interleaves with another's.

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};

use crate::errors::ServiceError;

pub mod json_file_store;
pub mod state;

pub use json_file_store::JsonFileStore;
pub use state::{CounterRepair, Record, TodoState};

/// Durable sink for state snapshots.
#[async_trait]
pub trait Persister: Send + Sync {
    async fn persist(&self, state: &TodoState) -> Result<(), ServiceError>;
}

/// Persister that keeps nothing; state lives only as long as the process.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryPersister;

#[async_trait]
impl Persister for MemoryPersister {
    async fn persist(&self, _state: &TodoState) -> Result<(), ServiceError> {
        Ok(())
    }
}

pub struct TodoStore {
    state: Mutex<TodoState>,
    persister: Arc<dyn Persister>,
}

impl TodoStore {
    /// Wrap a state and its persister; the id counter is repaired first.
    pub fn new(mut state: TodoState, persister: Arc<dyn Persister>) -> Arc<Self> {
        state.repair_counter();
        Arc::new(Self { state: Mutex::new(state), persister })
    }

    /// Load (or initialize) the JSON file at `path` and bind it as the persister.
    pub async fn open_file<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let file = JsonFileStore::new(path);
        let state = file.load().await;
        Self::new(state, Arc::new(file))
    }

    pub fn in_memory(initial: TodoState) -> Arc<Self> {
        Self::new(initial, Arc::new(MemoryPersister))
    }

    /// Exclusive access to the live state.
    pub async fn lock(&self) -> StateGuard<'_> {
        StateGuard { state: self.state.lock().await, persister: self.persister.as_ref() }
    }

    pub async fn snapshot(&self) -> TodoState {
        self.state.lock().await.clone()
    }
}

/// Locked, mutable view of the state with the store's persister bound to it.
pub struct StateGuard<'a> {
    state: MutexGuard<'a, TodoState>,
    persister: &'a dyn Persister,
}

impl StateGuard<'_> {
    /// Flush the current snapshot.
    pub async fn persist(&self) -> Result<(), ServiceError> {
        self.persister.persist(&self.state).await
    }
}

impl Deref for StateGuard<'_> {
    type Target = TodoState;

    fn deref(&self) -> &TodoState {
        &self.state
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut TodoState {
        &mut self.state
    }
}
