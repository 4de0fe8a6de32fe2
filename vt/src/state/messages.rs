//! State manager messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;
use ventstore::StoreError;

use crate::domain::{Task, Vent};

/// Errors from state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Channel error")]
    ChannelError,
}

impl From<StoreError> for StateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => StateError::NotFound(id),
            StoreError::Json(e) => StateError::DeserializationError(e.to_string()),
            other => StateError::StoreError(other.to_string()),
        }
    }
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    // Task operations
    CreateTask {
        task: Task,
        reply: oneshot::Sender<StateResponse<String>>,
    },
    CreateTasks {
        tasks: Vec<Task>,
        reply: oneshot::Sender<StateResponse<Vec<String>>>,
    },
    GetTask {
        id: String,
        reply: oneshot::Sender<StateResponse<Option<Task>>>,
    },
    UpdateTask {
        task: Task,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    UpdateTasks {
        tasks: Vec<Task>,
        reply: oneshot::Sender<StateResponse<usize>>,
    },
    DeleteTask {
        id: String,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    DeleteCompletedTasks {
        reply: oneshot::Sender<StateResponse<usize>>,
    },
    ListTasks {
        completed_filter: Option<bool>,
        reply: oneshot::Sender<StateResponse<Vec<Task>>>,
    },

    // Vent operations
    CreateVent {
        vent: Vent,
        reply: oneshot::Sender<StateResponse<String>>,
    },
    CreateVents {
        vents: Vec<Vent>,
        reply: oneshot::Sender<StateResponse<Vec<String>>>,
    },
    ListVents {
        reply: oneshot::Sender<StateResponse<Vec<Vent>>>,
    },
    DeleteVent {
        id: String,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    DeleteAllVents {
        reply: oneshot::Sender<StateResponse<usize>>,
    },
    MarkVentsProcessed {
        reply: oneshot::Sender<StateResponse<usize>>,
    },

    // Maintenance
    RebuildIndexes {
        reply: oneshot::Sender<StateResponse<usize>>,
    },

    // Shutdown
    Shutdown,
}
