//! Recurring task engine
//!
//! Completed recurring tasks reopen on their cadence, either through the
//! deferred single-task reset after a manual completion or through the
//! periodic sweep over every task.

mod clock;
mod engine;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{next_due_date, reset, sweep};
pub use sweeper::{RecurrenceSweeper, schedule_reset};
