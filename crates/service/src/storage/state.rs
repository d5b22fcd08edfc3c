use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

/// A single todo record as stored on disk and returned by the API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Always a strict boolean once loaded, whatever JSON type the file held.
    #[serde(default, deserialize_with = "truthy")]
    pub done: bool,
    #[serde(default)]
    pub created_at: String,
}

/// The whole persisted collection plus the id counter.
///
/// `todos`/`seq` are accepted on read so files written by the previous
/// implementation keep loading; writes always use `records`/`next_id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoState {
    #[serde(default, alias = "todos")]
    pub records: Vec<Record>,
    #[serde(default = "first_id", alias = "seq")]
    pub next_id: i64,
}

fn first_id() -> i64 { 1 }

/// Outcome of `TodoState::repair_counter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterRepair {
    Intact,
    Raised,
    /// A stored id is `i64::MAX`; no further ids can be handed out.
    Exhausted,
}

impl Default for TodoState {
    fn default() -> Self {
        Self { records: Vec::new(), next_id: first_id() }
    }
}

impl TodoState {
    pub fn max_id(&self) -> Option<i64> {
        self.records.iter().map(|r| r.id).max()
    }

    /// Raise `next_id` above every stored id.
    pub fn repair_counter(&mut self) -> CounterRepair {
        let floor = match self.max_id() {
            None => 1,
            Some(max) => match max.checked_add(1) {
                Some(next) => next.max(1),
                None => {
                    // no id left above the stored maximum; allocate_id refuses from here on
                    self.next_id = i64::MAX;
                    return CounterRepair::Exhausted;
                }
            },
        };
        if self.next_id < floor {
            self.next_id = floor;
            CounterRepair::Raised
        } else {
            CounterRepair::Intact
        }
    }

    /// Take the next id and advance the counter. Fails once the id space is used up.
    pub fn allocate_id(&mut self) -> Result<i64, ServiceError> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| ServiceError::Persistence("id counter exhausted".into()))?;
        Ok(id)
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

/// Loose truthiness: `false`, `0`, `""` and `null` are false, anything else is true.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
