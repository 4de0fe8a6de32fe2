//! Prompt assembly from vents and task notes

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PLACEHOLDER;
use crate::domain::Task;

/// Heading that introduces existing task notes in the combined text
const NOTES_HEADING: &str = "\n\nExisting task notes to consider:\n";

/// A task title with the user's notes on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNote {
    pub title: String,
    pub notes: String,
}

impl TaskNote {
    pub fn new(title: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: notes.into(),
        }
    }
}

/// Notes worth feeding back to the model: tasks with non-blank notes
pub fn notes_from_tasks(tasks: &[Task]) -> Vec<TaskNote> {
    tasks
        .iter()
        .filter_map(|t| t.notes().map(|notes| TaskNote::new(&t.title, notes)))
        .collect()
}

/// Number the vents and append any task notes
///
/// Each vent becomes `"<n>. <text>\n\n"`.
pub fn combine(vents: &[String], notes: &[TaskNote]) -> String {
    let mut combined = String::new();
    for (i, vent) in vents.iter().enumerate() {
        combined.push_str(&format!("{}. {}\n\n", i + 1, vent));
    }

    if !notes.is_empty() {
        combined.push_str(NOTES_HEADING);
        for note in notes {
            combined.push_str(&format!("- {}: {}\n", note.title, note.notes));
        }
    }

    combined
}

/// Build the final prompt
///
/// Only the first `{text}` is substituted; later placeholders stay literal and
/// a template without one comes back unchanged.
pub fn build(vents: &[String], notes: &[TaskNote], template: &str) -> String {
    debug!(vent_count = vents.len(), note_count = notes.len(), "build: called");
    template.replacen(PLACEHOLDER, &combine(vents, notes), 1)
}
