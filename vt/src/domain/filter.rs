//! Task list filters

use super::priority::Priority;
use super::recurring::Recurrence;
use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "pending" | "open" => Ok(Self::Pending),
            _ => Err(format!("Unknown status: {} (expected all, completed, pending)", s)),
        }
    }
}

/// Recurrence filter; `NonRecurring` selects one-time tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceFilter {
    Daily,
    Weekly,
    Monthly,
    NonRecurring,
}

impl RecurrenceFilter {
    fn matches(&self, recurring: Recurrence) -> bool {
        match self {
            Self::Daily => recurring == Recurrence::Daily,
            Self::Weekly => recurring == Recurrence::Weekly,
            Self::Monthly => recurring == Recurrence::Monthly,
            Self::NonRecurring => !recurring.is_recurring(),
        }
    }
}

impl std::str::FromStr for RecurrenceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "non-recurring" | "none" => Ok(Self::NonRecurring),
            _ => Err(format!(
                "Unknown recurrence filter: {} (expected daily, weekly, monthly, non-recurring)",
                s
            )),
        }
    }
}

/// Combined filter; unset parts match everything
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub priority: Option<Priority>,
    pub recurrence: Option<RecurrenceFilter>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
        };
        status_ok
            && self.priority.is_none_or(|p| task.priority == p)
            && self.recurrence.is_none_or(|r| r.matches(task.recurring))
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}
