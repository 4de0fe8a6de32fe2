//! Aggregate task statistics

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::priority::Priority;
use super::task::Task;

/// How many recent completions to report
const RECENT_COMPLETIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentCompletion {
    pub title: String,
    pub completed_at: DateTime<Utc>,
}

/// Counts and recent activity over a task list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    /// Rounded percentage, 0 when there are no tasks
    pub completion_rate: u32,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Newest first
    pub recent: Vec<RecentCompletion>,
}

impl TaskStats {
    pub fn compute(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let completion_rate = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };

        let count = |p: Priority| tasks.iter().filter(|t| t.priority == p).count();

        let mut recent: Vec<RecentCompletion> = tasks
            .iter()
            .filter(|t| t.completed)
            .filter_map(|t| {
                t.completed_at.map(|completed_at| RecentCompletion {
                    title: t.title.clone(),
                    completed_at,
                })
            })
            .collect();
        recent.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        recent.truncate(RECENT_COMPLETIONS);

        Self {
            total,
            completed,
            completion_rate,
            high: count(Priority::High),
            medium: count(Priority::Medium),
            low: count(Priority::Low),
            recent,
        }
    }
}

/// Human relative time, e.g. "5 min ago"
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - then;
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if minutes < 60 {
        if minutes <= 1 {
            "Just now".to_string()
        } else {
            format!("{} min ago", minutes)
        }
    } else if hours < 24 {
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if days == 1 {
        "1 day ago".to_string()
    } else {
        format!("{} days ago", days)
    }
}
