//! CLI command definitions and subcommands

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Priority, RecurrenceFilter, StatusFilter};

/// Ventask - turn frustrations into actionable tasks
#[derive(Parser)]
#[command(
    name = "vt",
    about = "Vent your frustrations, get back a task list",
    version,
    after_help = after_help()
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Keep the store and cache under this directory
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a frustration
    Vent {
        /// What is bothering you
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Keep an in-progress vent for later
    Draft {
        /// Text to keep for later; omit to show the current draft
        text: Vec<String>,

        /// Discard the saved draft
        #[arg(long, conflicts_with_all = ["text", "submit"])]
        clear: bool,

        /// Record the saved draft as a vent
        #[arg(long, conflicts_with = "text")]
        submit: bool,
    },

    /// List vents, newest first
    Vents {
        #[arg(long)]
        json: bool,
    },

    /// Delete one vent by id prefix or text fragment
    DeleteVent { id: String },

    /// Delete every vent
    ClearVents,

    /// Turn all vents into tasks with the configured LLM provider
    Generate,

    /// List tasks, newest first
    Tasks {
        /// all, completed or pending
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// low, medium or high
        #[arg(short, long)]
        priority: Option<Priority>,

        /// daily, weekly, monthly or non-recurring
        #[arg(short, long)]
        recurrence: Option<RecurrenceFilter>,

        #[arg(long)]
        json: bool,
    },

    /// Flip a task between pending and completed
    Toggle { id: String },

    /// Replace a task's notes (empty text clears them)
    Notes {
        id: String,
        #[arg(default_value = "")]
        text: String,
    },

    /// Manage a task's subtasks
    Subtask {
        #[command(subcommand)]
        command: SubtaskCommand,
    },

    /// Delete one task
    DeleteTask { id: String },

    /// Delete every completed task
    ClearCompleted,

    /// Completion rate, priority breakdown and recent completions
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Reopen completed recurring tasks that are due
    Sweep,

    /// Run the recurrence sweep until interrupted
    Watch,

    /// Write tasks and vents to a JSON file
    Export {
        /// Output path (default: ventask-YYYY-MM-DD.json)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Only export vents
        #[arg(long)]
        vents_only: bool,
    },

    /// Re-create tasks and vents from an export file
    Import { file: PathBuf },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

/// Subtask operations; positions are 1-based as printed by `tasks`
#[derive(Debug, Subcommand)]
pub enum SubtaskCommand {
    Add {
        id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Toggle { id: String, position: usize },
    Delete { id: String, position: usize },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Save an API key and optionally the provider
    Set {
        #[arg(long)]
        api_key: String,

        /// openai or anthropic
        #[arg(long)]
        provider: Option<String>,
    },

    /// Use a custom prompt template read from a file
    Prompt { file: PathBuf },

    /// Go back to the default prompt
    PromptReset,

    /// Use the bundled example prompt
    PromptExample,
}

/// Where the log file lives
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ventask")
        .join("logs")
        .join("ventask.log")
}

fn after_help() -> String {
    format!("Logs are written to: {}", get_log_path().display())
}
