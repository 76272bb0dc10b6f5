use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::io::kv::{KeyValueStore, StorageError};
use crate::model::task::{ListId, Priority, Task, TaskDraft, TaskId, TaskPatch};
use crate::model::view_state::{SortMode, ViewState};
use crate::ops::view::{DerivedView, derive_view};

/// Storage key holding the JSON-serialized task collection.
pub const TASKS_KEY: &str = "tasks";
/// Storage key holding the bare sort-mode string.
pub const SORT_MODE_KEY: &str = "sortValue";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("could not serialize task collection: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the canonical ordered task collection. Every mutation persists the
/// whole collection, all-or-nothing: the next collection is serialized and
/// written first, and only a successful write swaps it in.
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    tasks: Vec<Task>,
    sort: SortMode,
    /// One-shot undo slot holding the most recently deleted task.
    last_deleted: Option<Task>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the collection and sort mode from storage. Absent or malformed
    /// values fall back to an empty collection / the default sort mode, so
    /// a damaged store never prevents startup.
    pub fn open(storage: S) -> Self {
        let tasks = match storage.get(TASKS_KEY) {
            Some(text) => match serde_json::from_str::<Vec<Task>>(&text) {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!(%err, "malformed task collection, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        let sort = storage
            .get(SORT_MODE_KEY)
            .and_then(|s| SortMode::parse(&s))
            .unwrap_or_default();
        debug!(count = tasks.len(), sort = sort.as_str(), "opened task store");

        TaskStore {
            storage,
            tasks,
            sort,
            last_deleted: None,
        }
    }

    /// The canonical collection, head first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Derive the display projection for the given UI state.
    pub fn view(&self, state: &ViewState, today: NaiveDate) -> DerivedView {
        derive_view(&self.tasks, state, today)
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    /// Persist and switch the sort mode.
    pub fn set_sort_mode(&mut self, mode: SortMode) -> Result<(), StoreError> {
        self.storage.set(SORT_MODE_KEY, mode.as_str().to_string())?;
        self.sort = mode;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a task from a draft and insert it at the head of the
    /// collection. Assigns the id, created timestamp and derived flags.
    pub fn create(&mut self, draft: TaskDraft) -> Result<&Task, StoreError> {
        self.create_at(draft, Utc::now())
    }

    /// `create` with an explicit clock, for deterministic callers and tests.
    pub fn create_at(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Result<&Task, StoreError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let task = Task {
            id: self.next_id(now),
            title: title.to_string(),
            description: draft.description.trim().to_string(),
            completed: false,
            is_important: draft.priority == Priority::High || draft.list == ListId::Important,
            is_planned: draft.due_date.is_some() || draft.list == ListId::Planned,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at: now,
            list: draft.list,
        };
        debug!(id = %task.id, title = %task.title, "creating task");

        let mut next = Vec::with_capacity(self.tasks.len() + 1);
        next.push(task);
        next.extend(self.tasks.iter().cloned());
        self.commit(next)?;
        Ok(&self.tasks[0])
    }

    /// Apply a partial edit. The derived importance/planned flags are
    /// recomputed from the task's own fields after the patch.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<&Task, StoreError> {
        let idx = self.position(id)?;

        let mut task = self.tasks[idx].clone();
        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(StoreError::EmptyTitle);
            }
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description.trim().to_string();
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.is_important = task.priority == Priority::High || task.list == ListId::Important;
        task.is_planned = task.due_date.is_some() || task.list == ListId::Planned;

        let mut next = self.tasks.clone();
        next[idx] = task;
        self.commit(next)?;
        Ok(&self.tasks[idx])
    }

    /// Flip a task's completed state.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<&Task, StoreError> {
        let idx = self.position(id)?;
        let mut next = self.tasks.clone();
        next[idx].completed = !next[idx].completed;
        self.commit(next)?;
        Ok(&self.tasks[idx])
    }

    /// Remove a task, returning it. The removed task is also parked in the
    /// one-shot undo slot consumed by [`TaskStore::undo_delete`].
    pub fn delete(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let idx = self.position(id)?;
        let mut next = self.tasks.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        debug!(id = %removed.id, "deleted task");
        self.last_deleted = Some(removed.clone());
        Ok(removed)
    }

    /// Undo the most recent delete, reinserting the task at the head of the
    /// collection (not its original index). Returns `None` when there is
    /// nothing to undo; each delete can be undone at most once.
    pub fn undo_delete(&mut self) -> Result<Option<&Task>, StoreError> {
        match self.last_deleted.take() {
            Some(task) => {
                self.reinsert_at_head(task)?;
                Ok(Some(&self.tasks[0]))
            }
            None => Ok(None),
        }
    }

    /// Put a previously removed task back at the head of the collection.
    pub fn reinsert_at_head(&mut self, task: Task) -> Result<(), StoreError> {
        let mut next = Vec::with_capacity(self.tasks.len() + 1);
        next.push(task);
        next.extend(self.tasks.iter().cloned());
        self.commit(next)
    }

    /// Manual-reorder reconciliation: tasks named by `ids` move to the front
    /// in the given order, everything else keeps its prior relative order
    /// behind them. Ids not in the collection are ignored; no task is lost
    /// or duplicated.
    pub fn reconcile_order(&mut self, ids: &[TaskId]) -> Result<(), StoreError> {
        let mut remaining = self.tasks.clone();
        let mut next = Vec::with_capacity(remaining.len());
        for id in ids {
            if let Some(pos) = remaining.iter().position(|t| t.id == *id) {
                next.push(remaining.remove(pos));
            }
        }
        next.extend(remaining);
        self.commit(next)
    }

    /// Install the two sample tasks on a store whose storage has never held
    /// a collection. Returns whether seeding happened.
    pub fn seed_welcome_tasks(&mut self, now: DateTime<Utc>) -> Result<bool, StoreError> {
        if self.storage.get(TASKS_KEY).is_some() {
            return Ok(false);
        }
        let today = now.date_naive();
        let next = vec![
            Task {
                id: TaskId(1),
                title: "Welcome to your task list!".into(),
                description: "This is a sample task. You can edit or delete it.".into(),
                completed: false,
                priority: Priority::Medium,
                due_date: Some(today),
                created_at: now,
                list: ListId::MyDay,
                is_important: false,
                is_planned: true,
            },
            Task {
                id: TaskId(2),
                title: "Try creating tasks in different lists".into(),
                description: "Tasks added under Important and Planned pick up defaults for that list.".into(),
                completed: false,
                priority: Priority::High,
                due_date: None,
                created_at: now,
                list: ListId::Important,
                is_important: true,
                is_planned: false,
            },
        ];
        self.commit(next)?;
        debug!("seeded welcome tasks");
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn position(&self, id: TaskId) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Creation-time milliseconds, bumped past any id already taken.
    fn next_id(&self, now: DateTime<Utc>) -> TaskId {
        let mut id = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        while self.tasks.iter().any(|t| t.id.0 == id) {
            id += 1;
        }
        TaskId(id)
    }

    /// Serialize and write the next collection, then swap it in. On failure
    /// neither memory nor storage changes.
    fn commit(&mut self, next: Vec<Task>) -> Result<(), StoreError> {
        let text = serde_json::to_string(&next)?;
        self.storage.set(TASKS_KEY, text)?;
        self.tasks = next;
        Ok(())
    }
}
