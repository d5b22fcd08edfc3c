//! Todo record policy: id parsing, field coercion, timestamps and the CRUD service.

pub mod clock;
pub mod coerce;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use service::{CreateTodo, TodoService, UpdateTodo};
