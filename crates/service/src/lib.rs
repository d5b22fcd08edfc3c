//! Service layer for the todo record manager.
//! - `storage`: in-memory state, the `Persister` seam and the JSON file store.
//! - `todos`: validation, coercion and ordering policy on top of the store.

pub mod errors;
pub mod storage;
pub mod todos;
