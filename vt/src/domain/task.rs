//! Task domain type
//!
//! A Task is an actionable item extracted from one or more vents. Recurring
//! tasks cycle `Pending -> Completed -> Pending` on their cadence; others
//! stop at `Completed`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ventstore::{IndexValue, Record, now_ms};

use super::category::Category;
use super::id::{generate_id, generate_opaque_id};
use super::priority::Priority;
use super::recurring::Recurrence;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 800;
pub const SUBTASK_MAX_CHARS: usize = 200;

/// Truncate to at most `max` characters (not bytes)
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// A step inside a Task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Subtask {
    /// Trimmed and truncated; callers reject blank text before this point
    pub fn new(text: &str) -> Self {
        Self {
            id: generate_opaque_id(),
            text: truncate_chars(text.trim(), SUBTASK_MAX_CHARS),
            completed: false,
        }
    }
}

/// An actionable task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (e.g., "9f3c21ab-task-fix-the-printer")
    pub id: String,

    /// Short title (max 100 chars)
    pub title: String,

    /// Longer explanation (max 800 chars)
    pub description: String,

    pub category: Category,

    pub priority: Priority,

    pub recurring: Recurrence,

    /// Set iff `recurring != none`
    pub next_due: Option<DateTime<Utc>>,

    pub completed: bool,

    /// Set iff `completed`
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub subtasks: Vec<Subtask>,

    pub created_at: DateTime<Utc>,

    /// Last update timestamp (Unix milliseconds)
    #[serde(default)]
    pub updated_at: i64,
}

impl Task {
    /// Create a pending task; recurring tasks are due immediately
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        priority: Priority,
        recurring: Recurrence,
        now: DateTime<Utc>,
    ) -> Self {
        let title = truncate_chars(&title.into(), TITLE_MAX_CHARS);
        Self {
            id: generate_id("task", &title),
            title,
            description: truncate_chars(&description.into(), DESCRIPTION_MAX_CHARS),
            category,
            priority,
            recurring,
            next_due: recurring.is_recurring().then_some(now),
            completed: false,
            completed_at: None,
            notes: None,
            subtasks: Vec::new(),
            created_at: now,
            updated_at: now_ms(),
        }
    }

    /// Create a Task with a specific ID (for testing or import)
    pub fn with_id(id: impl Into<String>, title: impl Into<String>, recurring: Recurrence, now: DateTime<Utc>) -> Self {
        let mut task = Self::new(title, "", Category::General, Priority::Medium, recurring, now);
        task.id = id.into();
        task
    }

    /// Mark completed or pending, keeping `completed_at` in step
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then_some(now);
        self.touch();
    }

    /// Flip completion; returns the new state
    pub fn toggle(&mut self, now: DateTime<Utc>) -> bool {
        self.set_completed(!self.completed, now);
        self.completed
    }

    /// Replace notes; blank notes clear the field
    pub fn set_notes(&mut self, notes: &str) {
        let notes = notes.trim();
        self.notes = (!notes.is_empty()).then(|| notes.to_string());
        self.touch();
    }

    /// Non-blank notes, if any
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn add_subtask(&mut self, text: &str) -> &Subtask {
        self.subtasks.push(Subtask::new(text));
        self.touch();
        &self.subtasks[self.subtasks.len() - 1]
    }

    /// Flip a subtask by position; returns its new state
    pub fn toggle_subtask(&mut self, index: usize) -> Option<bool> {
        let subtask = self.subtasks.get_mut(index)?;
        subtask.completed = !subtask.completed;
        let completed = subtask.completed;
        self.touch();
        Some(completed)
    }

    pub fn remove_subtask(&mut self, index: usize) -> Option<Subtask> {
        if index >= self.subtasks.len() {
            return None;
        }
        let removed = self.subtasks.remove(index);
        self.touch();
        Some(removed)
    }

    /// Completed recurring task whose due time has arrived
    pub fn is_due_for_reset(&self, now: DateTime<Utc>) -> bool {
        self.recurring.is_recurring() && self.completed && self.next_due.is_some_and(|due| now >= due)
    }

    pub fn touch(&mut self) {
        self.updated_at = now_ms();
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn collection_name() -> &'static str {
        "tasks"
    }

    fn indexed_fields(&self) -> HashMap<String, IndexValue> {
        let mut fields = HashMap::new();
        fields.insert("completed".to_string(), IndexValue::Bool(self.completed));
        fields.insert("priority".to_string(), IndexValue::String(self.priority.to_string()));
        fields.insert("recurring".to_string(), IndexValue::String(self.recurring.to_string()));
        fields.insert("category".to_string(), IndexValue::String(self.category.to_string()));
        fields.insert("created_at".to_string(), IndexValue::Int(self.created_at.timestamp_millis()));
        fields
    }
}
