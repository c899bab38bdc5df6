//! The task list facade shared by the CLI and the terminal UI.
//!
//! `TaskListView` owns the store, the editor, the active query and the storage
//! port. Every mutation is applied in memory first and then persisted in full.

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::editor::{CommitOutcome, TaskEditor};
use crate::error::TaskListError;
use crate::fields::{Profile, StatusFilter};
use crate::progress::Progress;
use crate::query::{TaskQuery, ViewRow};
use crate::storage::TaskStorage;
use crate::store::TaskStore;
use crate::task::{Task, TaskId};

pub struct TaskListView {
    store: TaskStore,
    editor: TaskEditor,
    query: TaskQuery,
    profile: Profile,
    storage: Box<dyn TaskStorage>,
}

impl TaskListView {
    /// Read the storage once and build the view around it.
    pub fn load(storage: Box<dyn TaskStorage>, profile: Profile) -> Self {
        let store = TaskStore::from_tasks(storage.load());
        info!(source = %storage.describe(), count = store.len(), "loaded tasks");
        TaskListView {
            store,
            editor: TaskEditor::new(),
            query: TaskQuery::default(),
            profile,
            storage,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn editor(&self) -> &TaskEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut TaskEditor {
        &mut self.editor
    }

    pub fn query(&self) -> &TaskQuery {
        &self.query
    }

    pub fn storage_description(&self) -> String {
        self.storage.describe()
    }

    pub fn start_edit(&mut self, id: TaskId) -> Result<(), TaskListError> {
        self.editor.start_edit(&self.store, id)?;
        debug!(id = id.0, "editing task");
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    /// Commit the editor draft and persist the result.
    pub fn commit(&mut self, today: NaiveDate) -> Result<CommitOutcome, TaskListError> {
        let outcome = self.editor.commit(&mut self.store, self.profile, today)?;
        debug!(?outcome, "committed draft");
        self.persist()?;
        Ok(outcome)
    }

    /// Remove a task; a draft editing that task is discarded.
    pub fn delete(&mut self, id: TaskId) -> Result<Task, TaskListError> {
        let removed = self.store.remove(id)?;
        self.editor.task_removed(id);
        debug!(id = id.0, "deleted task");
        self.persist()?;
        Ok(removed)
    }

    /// Flip completion and return the new state.
    pub fn toggle(&mut self, id: TaskId) -> Result<bool, TaskListError> {
        let completed = self.store.toggle_completed(id)?;
        debug!(id = id.0, completed, "toggled task");
        self.persist()?;
        Ok(completed)
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.query.filter = filter;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    /// Rows to display. Profiles without query controls show every task.
    pub fn rows(&self, today: NaiveDate) -> Vec<ViewRow<'_>> {
        if self.profile.has_query() {
            self.query.apply(self.store.tasks(), today)
        } else {
            TaskQuery::default().apply(self.store.tasks(), today)
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::of(self.store.tasks())
    }

    fn persist(&mut self) -> Result<(), TaskListError> {
        if let Err(e) = self.storage.save(self.store.tasks()) {
            error!(dest = %self.storage.describe(), error = %e, "failed to save tasks");
            return Err(e.into());
        }
        Ok(())
    }
}
