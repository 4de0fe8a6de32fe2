//! Ventask - turn frustrations into actionable tasks
//!
//! CLI entry point.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tokio::sync::watch;
use tracing::{debug, info};

use ventask::cli::{Cli, Command, SettingsCommand, SubtaskCommand};
use ventask::config::{Config, StorageConfig};
use ventask::domain::{Task, TaskFilter, TaskStats, Vent, time_ago};
use ventask::{App, AppError, AppResult};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ventask")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("ventask.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(data_dir) = &cli.data_dir {
        config.storage = StorageConfig::under(data_dir);
    }
    config.validate().context("Invalid configuration")?;
    info!(provider = %config.llm.provider, "ventask loaded config");

    let app = App::open(config).context("Failed to open store")?;

    debug!(command = ?cli.command, "main: dispatching command");
    let result = dispatch(&app, cli.command).await;
    let _ = app.state().shutdown().await;

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        eprintln!("{} {}", "✗".red(), e);
        if let AppError::Provider(llm) = &e {
            if llm.is_auth_error() {
                eprintln!("  Check your API key: vt settings set --api-key <KEY>");
            } else if llm.is_timeout() {
                eprintln!("  The provider did not answer in time; try again or raise llm.timeout-ms");
            }
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn dispatch(app: &App, command: Command) -> AppResult<()> {
    match command {
        Command::Vent { text } => {
            let vent = app.add_vent(&text.join(" ")).await?;
            println!("{} Vent saved: {}", "✓".green(), short_id(&vent.id).cyan());
        }
        Command::Draft { text, clear, submit } => draft(app, &text.join(" "), clear, submit).await?,
        Command::Vents { json } => {
            let vents = app.vents().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&vents)?);
            } else if vents.is_empty() {
                println!("No vents yet");
            } else {
                vents.iter().for_each(print_vent);
            }
        }
        Command::DeleteVent { id } => {
            let vent = app.delete_vent(&id).await?;
            println!("{} Deleted vent: {}", "✓".green(), vent.text);
        }
        Command::ClearVents => {
            let removed = app.clear_vents().await?;
            println!("{} Cleared {} vents", "✓".green(), removed);
        }
        Command::Generate => {
            println!("{}", "Analyzing your frustrations...".dimmed());
            let generation = app.generate().await?;
            println!("{} {}", "✓".green(), generation.message());
            generation.tasks.iter().for_each(print_task);
        }
        Command::Tasks {
            status,
            priority,
            recurrence,
            json,
        } => {
            let filter = TaskFilter {
                status,
                priority,
                recurrence,
            };
            let tasks = app.tasks(&filter).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks match");
            } else {
                tasks.iter().for_each(print_task);
            }
        }
        Command::Toggle { id } => {
            let toggled = app.toggle_task(&id).await?;
            let state = if toggled.task.completed { "completed" } else { "pending" };
            println!("{} {} is now {}", "✓".green(), toggled.task.title, state);

            if let Some(handle) = toggled.pending_reset {
                let reopened = handle.await.map_err(std::io::Error::other)??;
                if let Some(task) = reopened {
                    println!("{} Recurring task \"{}\" has been reset", "↻".cyan(), task.title);
                }
            }
        }
        Command::Notes { id, text } => {
            let task = app.set_notes(&id, &text).await?;
            match task.notes() {
                Some(_) => println!("{} Notes saved for {}", "✓".green(), task.title),
                None => println!("{} Notes cleared for {}", "✓".green(), task.title),
            }
        }
        Command::Subtask { command } => match command {
            SubtaskCommand::Add { id, text } => {
                let task = app.add_subtask(&id, &text.join(" ")).await?;
                println!("{} Subtask added successfully!", "✓".green());
                print_task(&task);
            }
            SubtaskCommand::Toggle { id, position } => {
                let task = app.toggle_subtask(&id, subtask_index(position)?).await?;
                print_task(&task);
            }
            SubtaskCommand::Delete { id, position } => {
                let task = app.delete_subtask(&id, subtask_index(position)?).await?;
                println!("{} Subtask deleted", "✓".green());
                print_task(&task);
            }
        },
        Command::DeleteTask { id } => {
            let task = app.delete_task(&id).await?;
            println!("{} Deleted task: {}", "✓".green(), task.title);
        }
        Command::ClearCompleted => {
            let removed = app.clear_completed().await?;
            println!("{} Cleared {} completed tasks", "✓".green(), removed);
        }
        Command::Stats { json } => {
            let stats = app.stats().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
        Command::Sweep => {
            let reopened = app.sweep().await?;
            println!("{} Reopened {} recurring tasks", "✓".green(), reopened.len());
            reopened.iter().for_each(print_task);
        }
        Command::Watch => watch_recurrence(app).await,
        Command::Export { out, vents_only } => {
            let path = app.export(out.as_deref(), vents_only).await?;
            let what = if vents_only { "Vents" } else { "Tasks" };
            println!("{} {} exported successfully! {}", "✓".green(), what, path.display());
        }
        Command::Import { file } => {
            let (tasks, vents) = app.import(&file).await?;
            println!("{} Imported {} tasks and {} vents", "✓".green(), tasks, vents);
        }
        Command::Settings { command } => settings(app, command)?,
    }
    Ok(())
}

async fn draft(app: &App, text: &str, clear: bool, submit: bool) -> AppResult<()> {
    if clear {
        app.save_draft("")?;
        println!("{} Draft cleared", "✓".green());
    } else if submit {
        let saved = app.draft()?.unwrap_or_default();
        let vent = app.add_vent(&saved).await?;
        println!("{} Vent saved: {}", "✓".green(), short_id(&vent.id).cyan());
    } else if !text.is_empty() {
        app.save_draft(text)?;
        println!("{} Draft saved", "✓".green());
    } else {
        match app.draft()? {
            Some(saved) => println!("{}", saved),
            None => println!("No draft saved"),
        }
    }
    Ok(())
}

fn settings(app: &App, command: SettingsCommand) -> AppResult<()> {
    match command {
        SettingsCommand::Show => {
            let settings = app.settings()?;
            let provider = app.provider()?;
            let key = match &settings.api_key {
                Some(key) => mask(key),
                None => "(from environment)".dimmed().to_string(),
            };
            let prompt = if settings.custom_prompt.is_some() { "custom" } else { "default" };
            println!("Provider: {}", provider.cyan());
            println!("API key:  {}", key);
            println!("Prompt:   {}", prompt);
            if let Some(draft) = app.draft()? {
                println!("Draft:    {}", draft);
            }
        }
        SettingsCommand::Set { api_key, provider } => {
            app.save_settings(&api_key, provider.as_deref())?;
            println!("{} Settings saved successfully!", "✓".green());
        }
        SettingsCommand::Prompt { file } => {
            app.set_custom_prompt(&fs::read_to_string(&file)?)?;
            println!("{} Custom prompt saved", "✓".green());
        }
        SettingsCommand::PromptReset => {
            app.reset_prompt()?;
            println!("{} Prompt reset to default", "✓".green());
        }
        SettingsCommand::PromptExample => {
            app.load_example_prompt()?;
            println!("{} Example prompt loaded", "✓".green());
        }
    }
    Ok(())
}

async fn watch_recurrence(app: &App) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tokio::spawn(app.sweeper().run(shutdown_rx));
    println!(
        "Sweeping recurring tasks every {}s (Ctrl-C to stop)",
        app.config().recurrence.sweep_interval_secs
    );

    let _ = tokio::signal::ctrl_c().await;
    info!("Interrupted, stopping sweeper");
    let _ = shutdown_tx.send(true);
    let _ = sweeper.await;
}

fn subtask_index(position: usize) -> AppResult<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| AppError::validation("Subtask positions start at 1"))
}

fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

fn mask(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{}", tail)
}

fn print_vent(vent: &Vent) {
    let marker = if vent.processed { "✓".green() } else { "•".yellow() };
    println!(
        "{} {} {} {}",
        marker,
        short_id(&vent.id).cyan(),
        vent.date.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        vent.text
    );
}

fn print_task(task: &Task) {
    let check = if task.completed { "[x]".green() } else { "[ ]".normal() };
    let priority = match task.priority.to_string().as_str() {
        "high" => "high".red(),
        "low" => "low".blue(),
        other => other.yellow(),
    };
    let mut tags = format!("{}, {}", priority, task.category);
    if task.recurring.is_recurring() {
        tags.push_str(&format!(", {}", task.recurring));
    }

    println!("{} {} {} ({})", check, short_id(&task.id).cyan(), task.title.bold(), tags);
    if !task.description.is_empty() {
        println!("      {}", task.description.dimmed());
    }
    if let Some(notes) = task.notes() {
        println!("      {} {}", "notes:".dimmed(), notes);
    }
    for (i, subtask) in task.subtasks.iter().enumerate() {
        let mark = if subtask.completed { "x" } else { " " };
        println!("      {}. [{}] {}", i + 1, mark, subtask.text);
    }
}

fn print_stats(stats: &TaskStats) {
    println!("Total:       {}", stats.total);
    println!("Completed:   {}", stats.completed);
    println!("Completion:  {}%", stats.completion_rate);
    println!(
        "Priority:    {} high, {} medium, {} low",
        stats.high, stats.medium, stats.low
    );

    println!();
    if stats.recent.is_empty() {
        println!("No recent completions");
        return;
    }
    println!("Recent completions:");
    let now = chrono::Utc::now();
    for recent in &stats.recent {
        println!("  {} {}", recent.title, time_ago(recent.completed_at, now).dimmed());
    }
}
