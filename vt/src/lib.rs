//! Ventask - turn frustrations into actionable tasks
//!
//! Collects free-text "vents", asks an LLM provider to turn them into a
//! structured task list, and keeps the resulting tasks moving through their
//! recurrence cycle.
//!
//! # Architecture
//!
//! ```text
//! vents ──► prompts ──► llm ──► extract::normalizer ──► Task[]
//!                                                        │
//!                          state::StateManager ◄─────────┘
//!                                  ▲
//!                 recurrence::RecurrenceSweeper (timer)
//! ```

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod extract;
pub mod llm;
pub mod prompts;
pub mod recurrence;
pub mod state;

pub use app::{App, AppState};
pub use config::Config;
pub use domain::{Category, Priority, Recurrence, Subtask, Task, Vent};
pub use error::{AppError, AppResult};
pub use state::StateManager;
