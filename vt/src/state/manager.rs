//! StateManager - actor that owns the Store
//!
//! Processes commands via channels for serialized access to persistent state.

use std::path::Path;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::domain::{Filter, Order, Store, Task, Vent};

use super::messages::{StateCommand, StateError, StateResponse};

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor over a store directory
    pub fn spawn(store_dir: impl AsRef<Path>) -> eyre::Result<Self> {
        debug!(store_dir = %store_dir.as_ref().display(), "spawn: called");
        let store = Store::open(store_dir.as_ref())?;
        Self::spawn_with_store(store)
    }

    /// Spawn over an in-memory store
    pub fn spawn_in_memory() -> eyre::Result<Self> {
        debug!("spawn_in_memory: called");
        Self::spawn_with_store(Store::open_in_memory()?)
    }

    fn spawn_with_store(mut store: Store) -> eyre::Result<Self> {
        let task_count = store.rebuild_indexes::<Task>()?;
        let vent_count = store.rebuild_indexes::<Vent>()?;
        info!(task_count, vent_count, "Rebuilt indexes for Task and Vent records");

        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(actor_loop(store, rx));

        info!("StateManager spawned");
        Ok(Self { tx })
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<StateResponse<T>>) -> StateCommand) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    // === Task operations ===

    pub async fn create_task(&self, task: Task) -> StateResponse<String> {
        debug!(task_id = %task.id, "create_task: called");
        self.request(|reply| StateCommand::CreateTask { task, reply }).await
    }

    /// Insert a batch of tasks in one transaction
    pub async fn create_tasks(&self, tasks: Vec<Task>) -> StateResponse<Vec<String>> {
        debug!(count = tasks.len(), "create_tasks: called");
        self.request(|reply| StateCommand::CreateTasks { tasks, reply }).await
    }

    pub async fn get_task(&self, id: &str) -> StateResponse<Option<Task>> {
        debug!(%id, "get_task: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::GetTask { id, reply }).await
    }

    /// Replace a task by id; `NotFound` if it was deleted meanwhile
    pub async fn update_task(&self, task: Task) -> StateResponse<()> {
        debug!(task_id = %task.id, completed = task.completed, "update_task: called");
        self.request(|reply| StateCommand::UpdateTask { task, reply }).await
    }

    pub async fn update_tasks(&self, tasks: Vec<Task>) -> StateResponse<usize> {
        debug!(count = tasks.len(), "update_tasks: called");
        self.request(|reply| StateCommand::UpdateTasks { tasks, reply }).await
    }

    pub async fn delete_task(&self, id: &str) -> StateResponse<()> {
        debug!(%id, "delete_task: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::DeleteTask { id, reply }).await
    }

    /// Delete every completed task; returns how many went
    pub async fn delete_completed_tasks(&self) -> StateResponse<usize> {
        debug!("delete_completed_tasks: called");
        self.request(|reply| StateCommand::DeleteCompletedTasks { reply }).await
    }

    /// Tasks newest first, optionally by completion
    pub async fn list_tasks(&self, completed_filter: Option<bool>) -> StateResponse<Vec<Task>> {
        debug!(?completed_filter, "list_tasks: called");
        self.request(|reply| StateCommand::ListTasks { completed_filter, reply })
            .await
    }

    // === Vent operations ===

    pub async fn create_vent(&self, vent: Vent) -> StateResponse<String> {
        debug!(vent_id = %vent.id, "create_vent: called");
        self.request(|reply| StateCommand::CreateVent { vent, reply }).await
    }

    pub async fn create_vents(&self, vents: Vec<Vent>) -> StateResponse<Vec<String>> {
        debug!(count = vents.len(), "create_vents: called");
        self.request(|reply| StateCommand::CreateVents { vents, reply }).await
    }

    /// Vents newest first
    pub async fn list_vents(&self) -> StateResponse<Vec<Vent>> {
        debug!("list_vents: called");
        self.request(|reply| StateCommand::ListVents { reply }).await
    }

    pub async fn delete_vent(&self, id: &str) -> StateResponse<()> {
        debug!(%id, "delete_vent: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::DeleteVent { id, reply }).await
    }

    pub async fn delete_all_vents(&self) -> StateResponse<usize> {
        debug!("delete_all_vents: called");
        self.request(|reply| StateCommand::DeleteAllVents { reply }).await
    }

    /// Flag every unprocessed vent as processed; returns how many changed
    pub async fn mark_vents_processed(&self) -> StateResponse<usize> {
        debug!("mark_vents_processed: called");
        self.request(|reply| StateCommand::MarkVentsProcessed { reply }).await
    }

    // === Maintenance ===

    pub async fn rebuild_indexes(&self) -> StateResponse<usize> {
        debug!("rebuild_indexes: called");
        self.request(|reply| StateCommand::RebuildIndexes { reply }).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> Result<(), StateError> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

/// Actor loop that processes commands
async fn actor_loop(mut store: Store, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("actor_loop: called");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::CreateTask { task, reply } => {
                debug!(task_id = %task.id, "actor_loop: CreateTask command");
                let _ = reply.send(store.create(task).map_err(StateError::from));
            }

            StateCommand::CreateTasks { tasks, reply } => {
                debug!(count = tasks.len(), "actor_loop: CreateTasks command");
                let _ = reply.send(store.create_many(tasks).map_err(StateError::from));
            }

            StateCommand::GetTask { id, reply } => {
                debug!(%id, "actor_loop: GetTask command");
                let _ = reply.send(store.get::<Task>(&id).map_err(StateError::from));
            }

            StateCommand::UpdateTask { task, reply } => {
                debug!(task_id = %task.id, "actor_loop: UpdateTask command");
                let _ = reply.send(store.update(task).map_err(StateError::from));
            }

            StateCommand::UpdateTasks { tasks, reply } => {
                debug!(count = tasks.len(), "actor_loop: UpdateTasks command");
                let _ = reply.send(store.update_many(tasks).map_err(StateError::from));
            }

            StateCommand::DeleteTask { id, reply } => {
                debug!(%id, "actor_loop: DeleteTask command");
                let _ = reply.send(store.delete::<Task>(&id).map_err(StateError::from));
            }

            StateCommand::DeleteCompletedTasks { reply } => {
                debug!("actor_loop: DeleteCompletedTasks command");
                let result = store
                    .delete_where::<Task>(&[Filter::eq("completed", true)])
                    .map_err(StateError::from);
                let _ = reply.send(result);
            }

            StateCommand::ListTasks { completed_filter, reply } => {
                debug!(?completed_filter, "actor_loop: ListTasks command");
                let filters: Vec<Filter> = completed_filter
                    .map(|completed| Filter::eq("completed", completed))
                    .into_iter()
                    .collect();
                let result = store
                    .list_ordered::<Task>(&filters, "created_at", Order::Desc)
                    .map_err(StateError::from);
                let _ = reply.send(result);
            }

            StateCommand::CreateVent { vent, reply } => {
                debug!(vent_id = %vent.id, "actor_loop: CreateVent command");
                let _ = reply.send(store.create(vent).map_err(StateError::from));
            }

            StateCommand::CreateVents { vents, reply } => {
                debug!(count = vents.len(), "actor_loop: CreateVents command");
                let _ = reply.send(store.create_many(vents).map_err(StateError::from));
            }

            StateCommand::ListVents { reply } => {
                debug!("actor_loop: ListVents command");
                let result = store
                    .list_ordered::<Vent>(&[], "date", Order::Desc)
                    .map_err(StateError::from);
                let _ = reply.send(result);
            }

            StateCommand::DeleteVent { id, reply } => {
                debug!(%id, "actor_loop: DeleteVent command");
                let _ = reply.send(store.delete::<Vent>(&id).map_err(StateError::from));
            }

            StateCommand::DeleteAllVents { reply } => {
                debug!("actor_loop: DeleteAllVents command");
                let _ = reply.send(store.delete_where::<Vent>(&[]).map_err(StateError::from));
            }

            StateCommand::MarkVentsProcessed { reply } => {
                debug!("actor_loop: MarkVentsProcessed command");
                let result = mark_vents_processed(&mut store);
                let _ = reply.send(result);
            }

            StateCommand::RebuildIndexes { reply } => {
                debug!("actor_loop: RebuildIndexes command");
                let result = store
                    .rebuild_indexes::<Task>()
                    .and_then(|tasks| Ok(tasks + store.rebuild_indexes::<Vent>()?))
                    .map_err(StateError::from);
                let _ = reply.send(result);
            }

            StateCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("actor_loop: exiting");
}

fn mark_vents_processed(store: &mut Store) -> StateResponse<usize> {
    let mut pending: Vec<Vent> = store.list(&[Filter::eq("processed", false)])?;
    for vent in &mut pending {
        vent.mark_processed();
    }
    Ok(store.update_many(pending)?)
}
