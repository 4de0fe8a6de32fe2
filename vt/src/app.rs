//! Application facade
//!
//! `App` owns the handles every command needs: the StateManager, the local
//! cache, the configuration and a clock. Each operation reads from and writes
//! to the store; the cache is only mirrored after a successful write so a
//! failed persistence never changes what the user sees.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{LocalCache, Settings};
use crate::config::Config;
use crate::domain::{IdResolver, Task, TaskFilter, TaskStats, Vent};
use crate::error::{AppError, AppResult};
use crate::export::{ExportDocument, VentExport};
use crate::extract::{Orchestrator, extract};
use crate::llm::{LlmClient, Provider};
use crate::prompts::{self, EXAMPLE_TEMPLATE};
use crate::recurrence::{Clock, RecurrenceSweeper, SystemClock, schedule_reset};
use crate::state::{StateManager, StateResponse};

/// Point-in-time view of both collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Newest first
    pub tasks: Vec<Task>,
    /// Newest first
    pub vents: Vec<Vent>,
}

/// Outcome of a successful generation
#[derive(Debug, Clone)]
pub struct Generation {
    pub tasks: Vec<Task>,
    pub vent_count: usize,
}

impl Generation {
    pub fn message(&self) -> String {
        format!(
            "Generated {} actionable tasks from {} frustrations!",
            self.tasks.len(),
            self.vent_count
        )
    }
}

/// A toggled task plus the deferred reset, when one was scheduled
#[derive(Debug)]
pub struct Toggled {
    pub task: Task,
    pub pending_reset: Option<JoinHandle<StateResponse<Option<Task>>>>,
}

#[derive(Clone)]
pub struct App {
    config: Config,
    state: StateManager,
    cache: LocalCache,
    clock: Arc<dyn Clock>,
    client: Option<Arc<dyn LlmClient>>,
}

impl App {
    pub fn new(config: Config, state: StateManager, cache: LocalCache) -> Self {
        Self {
            config,
            state,
            cache,
            clock: Arc::new(SystemClock),
            client: None,
        }
    }

    /// Spawn the state manager and cache at the configured locations
    pub fn open(config: Config) -> eyre::Result<Self> {
        debug!(store_dir = %config.storage.store_dir.display(), "open: called");
        let state = StateManager::spawn(&config.storage.store_dir)?;
        let cache = LocalCache::new(&config.storage.cache_dir);
        Ok(Self::new(config, state, cache))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a fixed client instead of building one from settings
    pub fn with_client(mut self, client: Arc<dyn LlmClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    // === Vents ===

    pub async fn add_vent(&self, text: &str) -> AppResult<Vent> {
        debug!(len = text.len(), "add_vent: called");
        if text.trim().is_empty() {
            return Err(AppError::validation("Please enter some text first"));
        }

        let vent = Vent::new(text, self.clock.now());
        self.state.create_vent(vent.clone()).await?;
        self.cache.save_draft("")?;
        self.mirror_vents().await;
        info!(vent_id = %vent.id, "Vent saved");
        Ok(vent)
    }

    /// Vents newest first, from the cache when the store is unreachable
    pub async fn vents(&self) -> AppResult<Vec<Vent>> {
        match self.state.list_vents().await {
            Ok(vents) => Ok(vents),
            Err(e) => {
                warn!(error = %e, "Store unavailable, reading cached vents");
                self.cache.vents().map_err(|_| e.into())
            }
        }
    }

    pub async fn delete_vent(&self, reference: &str) -> AppResult<Vent> {
        debug!(%reference, "delete_vent: called");
        let vents = self.state.list_vents().await?;
        let id = resolve_id(&vents.iter().map(|v| (v.id.clone(), v.text.clone())).collect(), reference, "vent")?;
        self.state.delete_vent(&id).await?;
        self.mirror_vents().await;
        vents
            .into_iter()
            .find(|v| v.id == id)
            .ok_or_else(|| AppError::validation(format!("No vent matches '{}'", reference)))
    }

    pub async fn clear_vents(&self) -> AppResult<usize> {
        debug!("clear_vents: called");
        let removed = self.state.delete_all_vents().await?;
        self.mirror_vents().await;
        Ok(removed)
    }

    // === Draft ===

    pub fn save_draft(&self, text: &str) -> AppResult<()> {
        self.cache.save_draft(text)
    }

    pub fn draft(&self) -> AppResult<Option<String>> {
        self.cache.draft()
    }

    // === Settings ===

    pub fn settings(&self) -> AppResult<Settings> {
        self.cache.settings()
    }

    /// Save an API key and optionally switch provider
    pub fn save_settings(&self, api_key: &str, provider: Option<&str>) -> AppResult<Settings> {
        debug!(?provider, "save_settings: called");
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::validation("Please enter an API key"));
        }

        let mut settings = self.cache.settings()?;
        settings.api_key = Some(api_key.to_string());
        if let Some(provider) = provider {
            settings.provider = Some(provider.parse::<Provider>()?.to_string());
        }
        self.cache.save_settings(&settings)?;
        info!("Settings saved");
        Ok(settings)
    }

    pub fn set_custom_prompt(&self, template: &str) -> AppResult<()> {
        let mut settings = self.cache.settings()?;
        settings.custom_prompt = (!template.trim().is_empty()).then(|| template.to_string());
        self.cache.save_settings(&settings)
    }

    /// Drop the saved custom prompt so the default applies again
    pub fn reset_prompt(&self) -> AppResult<()> {
        self.set_custom_prompt("")
    }

    pub fn load_example_prompt(&self) -> AppResult<()> {
        self.set_custom_prompt(EXAMPLE_TEMPLATE)
    }

    /// Saved provider, else the configured default
    pub fn provider(&self) -> AppResult<String> {
        Ok(self
            .cache
            .settings()?
            .provider
            .unwrap_or_else(|| self.config.llm.provider.clone()))
    }

    /// Saved key first, then the provider's environment variable
    pub fn resolve_api_key(&self, provider: Provider) -> AppResult<Option<String>> {
        let saved = self
            .cache
            .settings()?
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Ok(saved.or_else(|| self.config.llm.env_api_key(provider)))
    }

    /// Saved custom prompt, then configured template, then the default
    pub fn template(&self) -> AppResult<String> {
        let saved = self.cache.settings()?.custom_prompt;
        let configured = self
            .config
            .prompt
            .custom_template()
            .map_err(|e| AppError::validation(e.to_string()))?;
        Ok(prompts::effective_template(&[saved.as_deref(), configured.as_deref()]).to_string())
    }

    // === Generation ===

    /// Turn every stored vent into tasks and mark the vents processed
    pub async fn generate(&self) -> AppResult<Generation> {
        debug!("generate: called");
        let provider_name = self.provider()?;
        let provider: Provider = provider_name.parse()?;
        let api_key = match (&self.client, self.resolve_api_key(provider)?) {
            (_, Some(key)) => key,
            (Some(_), None) => String::new(),
            (None, None) => {
                return Err(AppError::validation("Please configure your API key in settings first!"));
            }
        };

        let vents = self.state.list_vents().await?;
        if vents.is_empty() {
            return Err(AppError::validation("No vents found to process"));
        }

        let texts: Vec<String> = vents.iter().map(|v| v.text.clone()).collect();
        let existing = self.state.list_tasks(None).await?;
        let notes = prompts::notes_from_tasks(&existing);
        let template = self.template()?;
        let now = self.clock.now();

        let tasks = match &self.client {
            Some(client) => Orchestrator::new(client.clone()).run(&texts, &notes, &template, now).await?,
            None => {
                extract(
                    &texts,
                    &notes,
                    &template,
                    &provider_name,
                    &api_key,
                    &self.config.llm,
                    now,
                )
                .await?
            }
        };

        self.state.create_tasks(tasks.clone()).await?;
        self.state.mark_vents_processed().await?;
        self.mirror_tasks().await;
        self.mirror_vents().await;

        let generation = Generation {
            tasks,
            vent_count: texts.len(),
        };
        info!(message = %generation.message(), "Generation complete");
        Ok(generation)
    }

    // === Tasks ===

    /// Tasks newest first, from the cache when the store is unreachable
    pub async fn tasks(&self, filter: &TaskFilter) -> AppResult<Vec<Task>> {
        let tasks = match self.state.list_tasks(None).await {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "Store unavailable, reading cached tasks");
                self.cache.tasks().map_err(|_| AppError::from(e))?
            }
        };
        Ok(tasks.into_iter().filter(|t| filter.matches(t)).collect())
    }

    /// Full id for a typed reference (hex prefix, slug fragment or id)
    pub async fn resolve_task_id(&self, reference: &str) -> AppResult<String> {
        let tasks = self.state.list_tasks(None).await?;
        resolve_id(&tasks.iter().map(|t| (t.id.clone(), t.title.clone())).collect(), reference, "task")
    }

    pub async fn task(&self, reference: &str) -> AppResult<Task> {
        let id = self.resolve_task_id(reference).await?;
        self.state
            .get_task(&id)
            .await?
            .ok_or_else(|| AppError::validation(format!("No task matches '{}'", reference)))
    }

    /// Flip completion; completing a recurring task schedules its reset
    pub async fn toggle_task(&self, reference: &str) -> AppResult<Toggled> {
        debug!(%reference, "toggle_task: called");
        let mut task = self.task(reference).await?;
        let completed = task.toggle(self.clock.now());
        self.state.update_task(task.clone()).await?;
        self.mirror_tasks().await;

        let pending_reset = (completed && task.recurring.is_recurring()).then(|| {
            schedule_reset(
                self.state.clone(),
                self.clock.clone(),
                task.id.clone(),
                self.config.recurrence.reset_delay(),
            )
        });
        Ok(Toggled { task, pending_reset })
    }

    pub async fn set_notes(&self, reference: &str, notes: &str) -> AppResult<Task> {
        debug!(%reference, "set_notes: called");
        let mut task = self.task(reference).await?;
        task.set_notes(notes);
        self.save_task(task).await
    }

    pub async fn add_subtask(&self, reference: &str, text: &str) -> AppResult<Task> {
        debug!(%reference, "add_subtask: called");
        if text.trim().is_empty() {
            return Err(AppError::validation("Subtask text cannot be empty"));
        }
        let mut task = self.task(reference).await?;
        task.add_subtask(text);
        self.save_task(task).await
    }

    /// Flip a subtask by its zero-based position
    pub async fn toggle_subtask(&self, reference: &str, index: usize) -> AppResult<Task> {
        debug!(%reference, index, "toggle_subtask: called");
        let mut task = self.task(reference).await?;
        task.toggle_subtask(index)
            .ok_or_else(|| AppError::validation(format!("Subtask {} not found", index + 1)))?;
        self.save_task(task).await
    }

    pub async fn delete_subtask(&self, reference: &str, index: usize) -> AppResult<Task> {
        debug!(%reference, index, "delete_subtask: called");
        let mut task = self.task(reference).await?;
        task.remove_subtask(index)
            .ok_or_else(|| AppError::validation(format!("Subtask {} not found", index + 1)))?;
        self.save_task(task).await
    }

    pub async fn delete_task(&self, reference: &str) -> AppResult<Task> {
        debug!(%reference, "delete_task: called");
        let task = self.task(reference).await?;
        self.state.delete_task(&task.id).await?;
        self.mirror_tasks().await;
        Ok(task)
    }

    /// Remove every completed task; returns how many went
    pub async fn clear_completed(&self) -> AppResult<usize> {
        debug!("clear_completed: called");
        let removed = self.state.delete_completed_tasks().await?;
        self.mirror_tasks().await;
        info!(removed, "Cleared completed tasks");
        Ok(removed)
    }

    pub async fn stats(&self) -> AppResult<TaskStats> {
        Ok(TaskStats::compute(&self.tasks(&TaskFilter::default()).await?))
    }

    async fn save_task(&self, task: Task) -> AppResult<Task> {
        self.state.update_task(task.clone()).await?;
        self.mirror_tasks().await;
        Ok(task)
    }

    // === Recurrence ===

    pub fn sweeper(&self) -> RecurrenceSweeper {
        RecurrenceSweeper::new(
            self.state.clone(),
            self.clock.clone(),
            self.config.recurrence.sweep_interval(),
        )
        .with_cache(self.cache.clone())
    }

    /// One recurrence sweep; returns the reopened tasks
    pub async fn sweep(&self) -> AppResult<Vec<Task>> {
        Ok(self.sweeper().sweep_once().await?)
    }

    // === Snapshot, export, import ===

    pub async fn snapshot(&self) -> AppResult<AppState> {
        Ok(AppState {
            tasks: self.tasks(&TaskFilter::default()).await?,
            vents: self.vents().await?,
        })
    }

    pub async fn export(&self, out: Option<&Path>, vents_only: bool) -> AppResult<PathBuf> {
        debug!(?out, vents_only, "export: called");
        let now = self.clock.now();
        if vents_only {
            return VentExport::new(self.vents().await?, now).write(out);
        }
        let snapshot = self.snapshot().await?;
        ExportDocument::new(snapshot.tasks, snapshot.vents, now).write(out)
    }

    /// Re-create every record from an export; returns (tasks, vents) counts
    pub async fn import(&self, path: &Path) -> AppResult<(usize, usize)> {
        debug!(path = %path.display(), "import: called");
        let doc = ExportDocument::read(path)?;
        let task_count = doc.tasks.len();
        let vent_count = doc.vents.len();

        self.state.create_tasks(doc.tasks).await?;
        self.state.create_vents(doc.vents).await?;
        self.mirror_tasks().await;
        self.mirror_vents().await;

        info!(task_count, vent_count, "Imported");
        Ok((task_count, vent_count))
    }

    async fn mirror_tasks(&self) {
        match self.state.list_tasks(None).await {
            Ok(tasks) => self.cache.mirror_tasks(&tasks),
            Err(e) => warn!(error = %e, "Could not refresh task cache"),
        }
    }

    async fn mirror_vents(&self) {
        match self.state.list_vents().await {
            Ok(vents) => self.cache.mirror_vents(&vents),
            Err(e) => warn!(error = %e, "Could not refresh vent cache"),
        }
    }
}

fn resolve_id(names: &HashMap<String, String>, reference: &str, kind: &str) -> AppResult<String> {
    match IdResolver::new(names).resolve(reference) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(AppError::validation(format!("No {} matches '{}'", kind, reference))),
        Err(candidates) => Err(AppError::validation(format!(
            "'{}' matches several {}s: {}",
            reference,
            kind,
            candidates.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::domain::{Recurrence, StatusFilter};
    use crate::llm::LlmError;
    use crate::llm::client::mock::MockLlmClient;
    use crate::recurrence::ManualClock;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use tempfile::{TempDir, tempdir};

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
    }

    fn app(temp: &TempDir) -> (App, Arc<ManualClock>) {
        let mut config = Config::default();
        config.storage = StorageConfig::under(temp.path());
        config.recurrence.reset_delay_ms = 5;
        let clock = Arc::new(ManualClock::new(start()));
        let app = App::open(config).unwrap().with_clock(clock.clone());
        (app, clock)
    }

    fn extracted() -> serde_json::Value {
        json!([
            {
                "title": "Stretch every morning",
                "description": "Five minutes before coffee",
                "category": "Self-care",
                "priority": "low",
                "recurring": "daily",
            },
            {
                "title": "Book printer repair",
                "description": "Call the vendor",
                "category": "Action",
                "priority": "high",
                "recurring": "none",
                "subtasks": ["find contract", ""],
            }
        ])
    }

    #[tokio::test]
    async fn test_add_vent_rejects_blank() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);

        let err = app.add_vent("   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(app.vents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_vent_clears_draft_and_mirrors() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        app.save_draft("my back hurts").unwrap();

        let vent = app.add_vent("  my back hurts ").await.unwrap();
        assert_eq!(vent.text, "my back hurts");
        assert!(app.draft().unwrap().is_none());
        assert_eq!(app.cache().vents().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_requires_api_key() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        let mut config = app.config().clone();
        config.llm.api_key_env = Some("VENTASK_TEST_UNSET_KEY".to_string());
        let app = App::new(config, app.state().clone(), app.cache().clone());
        app.add_vent("printer jams").await.unwrap();

        let err = app.generate().await.unwrap_err();
        assert_eq!(err.to_string(), "Please configure your API key in settings first!");
    }

    #[tokio::test]
    async fn test_generate_requires_vents() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        let app = app.with_client(Arc::new(MockLlmClient::returning(extracted())));

        let err = app.generate().await.unwrap_err();
        assert_eq!(err.to_string(), "No vents found to process");
    }

    #[tokio::test]
    async fn test_generate_inserts_tasks_and_marks_vents() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        let client = Arc::new(MockLlmClient::returning(extracted()));
        let app = app.with_client(client.clone());
        app.add_vent("my back hurts").await.unwrap();
        app.add_vent("printer jams again").await.unwrap();

        let generation = app.generate().await.unwrap();
        assert_eq!(generation.message(), "Generated 2 actionable tasks from 2 frustrations!");

        let snapshot = app.snapshot().await.unwrap();
        assert_eq!(snapshot.tasks.len(), 2);
        assert!(snapshot.vents.iter().all(|v| v.processed));

        let repair = snapshot.tasks.iter().find(|t| t.title == "Book printer repair").unwrap();
        assert_eq!(repair.subtasks.len(), 1);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_provider_error_changes_nothing() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        let app = app.with_client(Arc::new(MockLlmClient::new(vec![Err(LlmError::ApiError {
            status: 429,
            message: "Rate limit reached".to_string(),
        })])));
        app.add_vent("printer jams").await.unwrap();

        let err = app.generate().await.unwrap_err();
        assert!(matches!(err, AppError::Provider(LlmError::ApiError { status: 429, .. })));

        let snapshot = app.snapshot().await.unwrap();
        assert!(snapshot.tasks.is_empty());
        assert!(!snapshot.vents[0].processed);
    }

    #[tokio::test]
    async fn test_toggle_recurring_schedules_reset() {
        let temp = tempdir().unwrap();
        let (app, clock) = app(&temp);
        let task = Task::with_id("9f3c21ab-task-stretch", "Stretch", Recurrence::Daily, start());
        app.state().create_task(task).await.unwrap();

        let toggled = app.toggle_task("stretch").await.unwrap();
        assert!(toggled.task.completed);
        clock.advance(Duration::seconds(2));

        let reopened = toggled.pending_reset.unwrap().await.unwrap().unwrap().unwrap();
        assert!(!reopened.completed);
        assert_eq!(reopened.next_due, Some(start() + Duration::seconds(2) + Duration::days(1)));
    }

    #[tokio::test]
    async fn test_toggle_one_time_task_has_no_reset() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        let task = Task::with_id("0a1b2c3d-task-file-taxes", "File taxes", Recurrence::None, start());
        app.state().create_task(task).await.unwrap();

        let toggled = app.toggle_task("0a1b").await.unwrap();
        assert!(toggled.task.completed);
        assert!(toggled.pending_reset.is_none());
    }

    #[tokio::test]
    async fn test_subtask_and_notes_edits() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        let task = Task::with_id("aa-task-plan", "Plan week", Recurrence::None, start());
        app.state().create_task(task).await.unwrap();

        assert!(matches!(
            app.add_subtask("aa-task-plan", "  ").await,
            Err(AppError::Validation(_))
        ));
        app.add_subtask("aa-task-plan", "list meetings").await.unwrap();
        let task = app.toggle_subtask("aa-task-plan", 0).await.unwrap();
        assert!(task.subtasks[0].completed);
        assert!(app.toggle_subtask("aa-task-plan", 3).await.is_err());

        let task = app.set_notes("aa-task-plan", "  moved standup  ").await.unwrap();
        assert_eq!(task.notes(), Some("moved standup"));

        let task = app.delete_subtask("aa-task-plan", 0).await.unwrap();
        assert!(task.subtasks.is_empty());
    }

    #[tokio::test]
    async fn test_clear_completed_and_filters() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        let mut done = Task::with_id("aa-task-done", "Done", Recurrence::None, start());
        done.set_completed(true, start());
        let open = Task::with_id("bb-task-open", "Open", Recurrence::Weekly, start());
        app.state().create_tasks(vec![done, open]).await.unwrap();

        let pending = TaskFilter {
            status: StatusFilter::Pending,
            ..TaskFilter::default()
        };
        assert_eq!(app.tasks(&pending).await.unwrap().len(), 1);

        assert_eq!(app.clear_completed().await.unwrap(), 1);
        let remaining = app.tasks(&TaskFilter::default()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "bb-task-open");
        assert_eq!(app.cache().tasks().unwrap(), remaining);
    }

    #[tokio::test]
    async fn test_ambiguous_reference() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        let a = Task::with_id("aa11-task-water-plants", "Water plants", Recurrence::None, start());
        let b = Task::with_id("aa22-task-water-lawn", "Water lawn", Recurrence::None, start());
        app.state().create_tasks(vec![a, b]).await.unwrap();

        let err = app.toggle_task("water").await.unwrap_err();
        assert!(err.to_string().contains("matches several tasks"));
        assert!(app.toggle_task("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_settings_and_prompt() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);

        assert!(matches!(app.save_settings("  ", None), Err(AppError::Validation(_))));
        assert!(matches!(
            app.save_settings("sk-x", Some("palm")),
            Err(AppError::Provider(LlmError::UnsupportedProvider(_)))
        ));

        app.save_settings("sk-x", Some("anthropic")).unwrap();
        assert_eq!(app.provider().unwrap(), "anthropic");
        assert_eq!(app.resolve_api_key(Provider::Anthropic).unwrap().as_deref(), Some("sk-x"));

        assert_eq!(app.template().unwrap(), prompts::DEFAULT_TEMPLATE);
        app.load_example_prompt().unwrap();
        assert_eq!(app.template().unwrap(), EXAMPLE_TEMPLATE);
        app.reset_prompt().unwrap();
        assert_eq!(app.template().unwrap(), prompts::DEFAULT_TEMPLATE);
    }

    #[tokio::test]
    async fn test_cache_fallback_when_store_is_down() {
        let temp = tempdir().unwrap();
        let (app, _) = app(&temp);
        app.add_vent("printer jams").await.unwrap();

        app.state().shutdown().await.unwrap();
        tokio::task::yield_now().await;

        let vents = app.vents().await.unwrap();
        assert_eq!(vents.len(), 1);
        assert!(matches!(app.add_vent("more").await, Err(AppError::Persistence(_))));
    }
}
