//! State management with actor pattern
//!
//! StateManager owns the ventstore Store and processes messages via channels,
//! so extraction, sweeps and user actions are serialized at the store.

mod manager;
mod messages;

pub use manager::StateManager;
pub use messages::{StateCommand, StateError, StateResponse};
