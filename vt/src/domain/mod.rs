//! Domain types for ventask
//!
//! Vent and Task implement the Record trait for ventstore persistence.

mod category;
mod filter;
mod id;
mod priority;
mod recurring;
mod stats;
mod task;
mod vent;

pub use category::Category;
pub use filter::{RecurrenceFilter, StatusFilter, TaskFilter};
pub use id::{IdResolver, generate_id, generate_opaque_id};
pub use priority::Priority;
pub use recurring::Recurrence;
pub use stats::{RecentCompletion, TaskStats, time_ago};
pub use task::{DESCRIPTION_MAX_CHARS, SUBTASK_MAX_CHARS, Subtask, TITLE_MAX_CHARS, Task, truncate_chars};
pub use vent::Vent;

// Re-export ventstore types for convenience
pub use ventstore::{Filter, FilterOp, IndexValue, Order, Record, Store};
