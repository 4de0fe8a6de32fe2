//! Raw LLM output to well-formed Tasks
//!
//! Never returns an empty list. Candidates with a missing or falsy required field
//! are dropped; if none survive the result is the "Reflect on current situation"
//! task. If the reply is structurally broken (not an array, non-object entries,
//! non-text values where text is expected) the result is the "Address current
//! concerns" task instead.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Category, Priority, Recurrence, Subtask, Task};

/// Fields every candidate must carry with a truthy value
const REQUIRED_FIELDS: [&str; 5] = ["title", "description", "category", "priority", "recurring"];

const EMPTY_RESULT_TITLE: &str = "Reflect on current situation";
const EMPTY_RESULT_DESCRIPTION: &str = "Take time to think through the issues mentioned and plan next steps. \
Consider what's working, what isn't, and what small changes you could make to improve your situation.";

const BROKEN_RESULT_TITLE: &str = "Address current concerns";
const BROKEN_RESULT_DESCRIPTION: &str = "Work on the issues mentioned in your recent thoughts. \
Start with the most pressing issue and take one small action to move forward.";

/// Structural problems in the raw reply; always recovered inside this module
#[derive(Debug, Error)]
enum NormalizationError {
    #[error("expected a task array, got {0}")]
    NotAnArray(&'static str),

    #[error("task entry {index} is {kind}, not an object")]
    NotAnObject { index: usize, kind: &'static str },

    #[error("task entry {index} has {kind} for {field}, not a string")]
    WrongType {
        index: usize,
        field: &'static str,
        kind: &'static str,
    },

    #[error("task entry {index} has {kind} at subtask {position}")]
    BadSubtask {
        index: usize,
        position: usize,
        kind: &'static str,
    },
}

/// Normalize a list of raw candidates
pub fn normalize(raw: &[Value], now: DateTime<Utc>) -> Vec<Task> {
    debug!(candidate_count = raw.len(), "normalize: called");
    finish(normalize_entries(raw, now), now)
}

/// Normalize whatever the provider returned as `tasks`
pub fn normalize_value(raw: &Value, now: DateTime<Utc>) -> Vec<Task> {
    debug!(kind = kind_of(raw), "normalize_value: called");
    let result = match raw {
        Value::Array(entries) => normalize_entries(entries, now),
        other => Err(NormalizationError::NotAnArray(kind_of(other))),
    };
    finish(result, now)
}

fn finish(result: Result<Vec<Task>, NormalizationError>, now: DateTime<Utc>) -> Vec<Task> {
    match result {
        Ok(tasks) if tasks.is_empty() => {
            debug!("finish: no valid candidates, using empty-result fallback");
            vec![fallback(EMPTY_RESULT_TITLE, EMPTY_RESULT_DESCRIPTION, Category::Planning, now)]
        }
        Ok(tasks) => {
            debug!(task_count = tasks.len(), "finish: normalized");
            tasks
        }
        Err(e) => {
            warn!(error = %e, "Could not normalize LLM output, using fallback task");
            vec![fallback(BROKEN_RESULT_TITLE, BROKEN_RESULT_DESCRIPTION, Category::General, now)]
        }
    }
}

fn fallback(title: &str, description: &str, category: Category, now: DateTime<Utc>) -> Task {
    Task::new(title, description, category, Priority::Medium, Recurrence::None, now)
}

fn normalize_entries(entries: &[Value], now: DateTime<Utc>) -> Result<Vec<Task>, NormalizationError> {
    let mut tasks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Value::Object(fields) = entry else {
            return Err(NormalizationError::NotAnObject {
                index,
                kind: kind_of(entry),
            });
        };
        match normalize_entry(index, fields, now)? {
            Some(task) => tasks.push(task),
            None => debug!(index, "normalize_entries: dropped candidate missing required fields"),
        }
    }
    Ok(tasks)
}

fn normalize_entry(
    index: usize,
    fields: &Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<Option<Task>, NormalizationError> {
    if REQUIRED_FIELDS.iter().any(|name| !fields.get(*name).is_some_and(is_truthy)) {
        return Ok(None);
    }

    let text = |name| text_field(index, fields, name);

    let title = text("title")?;
    let description = text("description")?;
    let priority = text("priority")?.parse().unwrap_or(Priority::Medium);
    let recurring = text("recurring")?.parse().unwrap_or(Recurrence::None);
    let category = fields
        .get("category")
        .and_then(Value::as_str)
        .and_then(|c| c.parse().ok())
        .unwrap_or(Category::General);

    let mut task = Task::new(title, description, category, priority, recurring, now);
    if let Some(Value::Array(items)) = fields.get("subtasks") {
        task.subtasks = normalize_subtasks(index, items)?;
    }
    Ok(Some(task))
}

fn text_field<'a>(
    index: usize,
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a str, NormalizationError> {
    let value = fields.get(name).unwrap_or(&Value::Null);
    value.as_str().ok_or(NormalizationError::WrongType {
        index,
        field: name,
        kind: kind_of(value),
    })
}

/// Strings or `{text}` objects; blanks and text-less entries dropped, nulls rejected
fn normalize_subtasks(index: usize, items: &[Value]) -> Result<Vec<Subtask>, NormalizationError> {
    let mut subtasks = Vec::new();
    for (position, item) in items.iter().enumerate() {
        let bad = |kind| NormalizationError::BadSubtask { index, position, kind };
        let text = match item {
            Value::String(text) => text.as_str(),
            Value::Null => return Err(bad("null")),
            Value::Object(obj) => match obj.get("text") {
                Some(Value::String(text)) => text.as_str(),
                Some(value) if is_truthy(value) => return Err(bad(kind_of(value))),
                _ => "",
            },
            _ => "",
        };
        if !text.trim().is_empty() {
            subtasks.push(Subtask::new(text));
        }
    }
    Ok(subtasks)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
