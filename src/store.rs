//! In-memory task store.
//!
//! `TaskStore` is the authoritative ordered sequence of tasks. Insertion order
//! is display order before any sorting. Mutations are available both by
//! position and by stable `TaskId`; the by-id forms resolve the position at
//! call time so callers never act on a stale index.

use std::collections::HashSet;

use tracing::debug;

use crate::error::StoreError;
use crate::task::{NewTask, Task, TaskId, TaskPatch};

/// Ordered collection of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded records, assigning fresh ids to records that
    /// have none or that repeat an earlier id.
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        let mut next = tasks.iter().map(|t| t.id.0).max().unwrap_or(0) + 1;
        let mut seen = HashSet::new();
        for task in tasks.iter_mut() {
            if task.id.0 == 0 || !seen.insert(task.id) {
                debug!(old = task.id.0, new = next, "renumbering task");
                task.id = TaskId(next);
                seen.insert(task.id);
                next += 1;
            }
        }
        TaskStore { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Generate the next available task ID.
    pub fn next_id(&self) -> TaskId {
        TaskId(self.tasks.iter().map(|t| t.id.0).max().unwrap_or(0) + 1)
    }

    /// Position of a task in insertion order.
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a task and return its new id.
    pub fn insert(&mut self, new: NewTask) -> TaskId {
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            text: new.text,
            date: new.date,
            priority: new.priority,
            completed: false,
        });
        id
    }

    pub fn replace_at(&mut self, index: usize, patch: &TaskPatch) -> Result<(), StoreError> {
        let task = self.slot_mut(index)?;
        patch.apply(task);
        Ok(())
    }

    /// Remove the task at `index`, keeping the relative order of the rest.
    pub fn remove_at(&mut self, index: usize) -> Result<Task, StoreError> {
        self.check(index)?;
        Ok(self.tasks.remove(index))
    }

    /// Flip the completion flag at `index` and return the new value.
    pub fn toggle_completed_at(&mut self, index: usize) -> Result<bool, StoreError> {
        let task = self.slot_mut(index)?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub fn replace(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let index = self.resolve(id)?;
        self.replace_at(index, patch)
    }

    pub fn remove(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let index = self.resolve(id)?;
        self.remove_at(index)
    }

    pub fn toggle_completed(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let index = self.resolve(id)?;
        self.toggle_completed_at(index)
    }

    fn resolve(&self, id: TaskId) -> Result<usize, StoreError> {
        self.position(id).ok_or(StoreError::UnknownTask(id))
    }

    fn check(&self, index: usize) -> Result<(), StoreError> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(StoreError::OutOfRange { index, len: self.tasks.len() })
        }
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Task, StoreError> {
        let len = self.tasks.len();
        self.tasks.get_mut(index).ok_or(StoreError::OutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::fields::Priority;

    fn sample() -> TaskStore {
        let mut store = TaskStore::new();
        store.insert(NewTask::text("a"));
        store.insert(NewTask {
            text: "b".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
            priority: Priority::High,
        });
        store
    }

    #[test]
    fn test_insert_appends_with_fresh_ids() {
        let store = sample();
        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].id, TaskId(1));
        assert_eq!(store.tasks()[1].id, TaskId(2));
        assert!(!store.tasks()[1].completed);
    }

    #[test]
    fn test_insert_then_remove_last_restores_store() {
        let mut store = sample();
        let before = store.clone();
        store.insert(NewTask::text("temp"));
        let last = store.len() - 1;
        let removed = store.remove_at(last).unwrap();
        assert_eq!(removed.text, "temp");
        assert_eq!(store, before);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut store = sample();
        assert_eq!(store.toggle_completed_at(0), Ok(true));
        assert_eq!(store.toggle_completed_at(0), Ok(false));
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn test_out_of_range_reports_and_leaves_store() {
        let mut store = sample();
        let before = store.clone();
        assert_eq!(
            store.remove_at(5),
            Err(StoreError::OutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            store.replace_at(2, &TaskPatch::default()),
            Err(StoreError::OutOfRange { index: 2, len: 2 })
        );
        assert!(store.toggle_completed_at(9).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = sample();
        store.insert(NewTask::text("c"));
        store.remove(TaskId(2)).unwrap();
        let texts: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert_eq!(store.remove(TaskId(2)), Err(StoreError::UnknownTask(TaskId(2))));
    }

    #[test]
    fn test_replace_by_id_follows_task_after_reorder() {
        let mut store = sample();
        store.remove_at(0).unwrap();
        let patch = TaskPatch { text: Some("b2".into()), ..TaskPatch::default() };
        store.replace(TaskId(2), &patch).unwrap();
        assert_eq!(store.get(TaskId(2)).map(|t| t.text.as_str()), Some("b2"));
    }

    #[test]
    fn test_from_tasks_repairs_missing_and_duplicate_ids() {
        let raw = r#"[{"text":"x","completed":false},{"id":3,"text":"y"},{"id":3,"text":"z"}]"#;
        let tasks: Vec<Task> = serde_json::from_str(raw).unwrap();
        let store = TaskStore::from_tasks(tasks);
        let ids: Vec<u64> = store.tasks().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![4, 3, 5]);
        assert_eq!(store.next_id(), TaskId(6));
    }
}
