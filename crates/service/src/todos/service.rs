use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{error, info};

use super::clock::{format_created_at, Clock, SystemClock};
use super::coerce::{parse_id, title_text, to_bool};
use crate::errors::ServiceError;
use crate::storage::{Record, StateGuard, TodoStore};

/// Create payload. Fields stay loosely typed so coercion happens here, not in serde.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub done: Option<Value>,
}

/// Partial update payload. A `null` title counts as absent; a `null` done is
/// present and coerces to false.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub done: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing field is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// CRUD operations over a shared `TodoStore`.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<TodoStore>,
    clock: Arc<dyn Clock>,
}

impl TodoService {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<TodoStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<TodoStore> {
        &self.store
    }

    /// All records, newest id first.
    pub async fn list(&self) -> Vec<Record> {
        let mut records = self.store.snapshot().await.records;
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records
    }

    pub async fn get(&self, raw_id: &str) -> Result<Record, ServiceError> {
        let id = parse_id(raw_id)?;
        let guard = self.store.lock().await;
        let found = guard.records.iter().find(|r| r.id == id).cloned();
        found.ok_or(ServiceError::NotFound(id))
    }

    pub async fn create(&self, input: CreateTodo) -> Result<Record, ServiceError> {
        let title = match input.title.as_ref() {
            Some(v) => title_text(v)?,
            None => String::new(),
        };
        if title.is_empty() {
            return Err(ServiceError::validation("field \"title\" is required"));
        }
        let done = to_bool(input.done.as_ref());

        let mut guard = self.store.lock().await;
        let record = Record {
            id: guard.allocate_id()?,
            title,
            done,
            created_at: format_created_at(self.clock.now()),
        };
        guard.records.push(record.clone());
        flush(&guard, "create", record.id).await?;
        info!(id = record.id, "todo created");
        Ok(record)
    }

    pub async fn update(&self, raw_id: &str, input: UpdateTodo) -> Result<Record, ServiceError> {
        let id = parse_id(raw_id)?;
        let mut guard = self.store.lock().await;
        let idx = guard.position(id).ok_or(ServiceError::NotFound(id))?;

        let title = match input.title.as_ref() {
            Some(v) => {
                let t = title_text(v)?;
                if t.is_empty() {
                    return Err(ServiceError::validation("field \"title\" must not be empty"));
                }
                Some(t)
            }
            None => None,
        };
        let done = input.done.as_ref().map(|v| to_bool(Some(v)));
        if title.is_none() && done.is_none() {
            return Err(ServiceError::validation("nothing to update"));
        }

        let record = &mut guard.records[idx];
        if let Some(t) = title {
            record.title = t;
        }
        if let Some(d) = done {
            record.done = d;
        }
        let updated = record.clone();
        flush(&guard, "update", id).await?;
        info!(id, "todo updated");
        Ok(updated)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<(), ServiceError> {
        let id = parse_id(raw_id)?;
        let mut guard = self.store.lock().await;
        let before = guard.records.len();
        guard.records.retain(|r| r.id != id);
        if guard.records.len() == before {
            return Err(ServiceError::NotFound(id));
        }
        flush(&guard, "delete", id).await?;
        info!(id, "todo deleted");
        Ok(())
    }
}

/// Persist after a mutation. The in-memory change is kept even when this fails.
async fn flush(guard: &StateGuard<'_>, op: &'static str, id: i64) -> Result<(), ServiceError> {
    guard.persist().await.map_err(|e| {
        error!(op, id, error = %e, "failed to persist todo store");
        e
    })
}
