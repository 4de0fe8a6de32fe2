//! Recurrence rules
//!
//! All functions take `now` explicitly; the next due date is always measured
//! from the moment of the reset, not from the previous due date.

use chrono::{DateTime, Duration, Months, Utc};
use tracing::debug;

use crate::domain::{Recurrence, Task};

/// Next due date for a cadence; monthly clamps to the last valid day
pub fn next_due_date(recurring: Recurrence, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match recurring {
        Recurrence::None => None,
        Recurrence::Daily => now.checked_add_signed(Duration::days(1)),
        Recurrence::Weekly => now.checked_add_signed(Duration::days(7)),
        Recurrence::Monthly => now.checked_add_months(Months::new(1)),
    }
}

/// Reopen a completed recurring task for its next cycle
///
/// Returns false, leaving the task untouched, when it is not recurring or
/// not completed.
pub fn reset(task: &mut Task, now: DateTime<Utc>) -> bool {
    if !task.recurring.is_recurring() || !task.completed {
        return false;
    }
    task.set_completed(false, now);
    task.next_due = next_due_date(task.recurring, now);
    debug!(task_id = %task.id, next_due = ?task.next_due, "reset: reopened");
    true
}

/// Reopen every completed recurring task whose due time has passed
///
/// Returns copies of the tasks that changed.
pub fn sweep(tasks: &mut [Task], now: DateTime<Utc>) -> Vec<Task> {
    debug!(task_count = tasks.len(), %now, "sweep: called");
    tasks
        .iter_mut()
        .filter(|task| task.is_due_for_reset(now))
        .filter_map(|task| reset(task, now).then(|| task.clone()))
        .collect()
}
