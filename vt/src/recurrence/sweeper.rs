//! Scheduled recurrence work against the state manager

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::engine::{reset, sweep};
use crate::cache::LocalCache;
use crate::domain::Task;
use crate::state::{StateManager, StateResponse};

/// Periodic sweep over all tasks
pub struct RecurrenceSweeper {
    state: StateManager,
    clock: Arc<dyn Clock>,
    interval: Duration,
    cache: Option<LocalCache>,
}

impl RecurrenceSweeper {
    pub fn new(state: StateManager, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            state,
            clock,
            interval,
            cache: None,
        }
    }

    /// Refresh the task mirror in `cache` after every pass that reopens something
    pub fn with_cache(mut self, cache: LocalCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// One pass: reopen due tasks and persist only what changed
    pub async fn sweep_once(&self) -> StateResponse<Vec<Task>> {
        debug!("sweep_once: called");
        let mut tasks = self.state.list_tasks(Some(true)).await?;
        let changed = sweep(&mut tasks, self.clock.now());

        if !changed.is_empty() {
            self.state.update_tasks(changed.clone()).await?;
            info!(count = changed.len(), "Reopened recurring tasks");

            if let Some(cache) = &self.cache {
                match self.state.list_tasks(None).await {
                    Ok(all) => cache.mirror_tasks(&all),
                    Err(e) => warn!(error = %e, "Could not refresh task cache"),
                }
            }
        }
        Ok(changed)
    }

    /// Sweep at startup, then every interval until shutdown is signalled
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "Recurrence sweeper started");

        loop {
            if let Err(e) = self.sweep_once().await {
                warn!(error = %e, "Recurrence sweep failed");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Recurrence sweeper stopped");
    }
}

/// Reset one task after `delay` if it is still completed by then
///
/// The handle yields the reopened task, or `None` when there was nothing to do.
pub fn schedule_reset(
    state: StateManager,
    clock: Arc<dyn Clock>,
    task_id: String,
    delay: Duration,
) -> JoinHandle<StateResponse<Option<Task>>> {
    debug!(%task_id, delay_ms = delay.as_millis() as u64, "schedule_reset: called");
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let Some(mut task) = state.get_task(&task_id).await? else {
            debug!(%task_id, "schedule_reset: task gone");
            return Ok(None);
        };
        if !reset(&mut task, clock.now()) {
            return Ok(None);
        }

        state.update_task(task.clone()).await?;
        info!(task_id = %task.id, title = %task.title, "Recurring task has been reset");
        Ok(Some(task))
    })
}
