//! Draft staging for creating and updating tasks.

use chrono::NaiveDate;
use tracing::debug;

use crate::dates::parse_date_input;
use crate::error::{StoreError, TaskListError, ValidationError};
use crate::fields::{Priority, Profile};
use crate::store::TaskStore;
use crate::task::{NewTask, TaskId, TaskPatch};

/// Uncommitted field values for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pub date: String,
    pub priority: Priority,
}

/// What a successful commit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Inserted(TaskId),
    Updated(TaskId),
}

/// Stages a single task's fields before they reach the store.
///
/// With no editing target a commit inserts a new task; with a target it
/// patches that task.
#[derive(Debug, Clone, Default)]
pub struct TaskEditor {
    pub draft: Draft,
    editing: Option<TaskId>,
}

impl TaskEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Copy the task into the draft and mark it as the editing target.
    pub fn start_edit(&mut self, store: &TaskStore, id: TaskId) -> Result<(), StoreError> {
        let task = store.get(id).ok_or(StoreError::UnknownTask(id))?;
        self.draft = Draft {
            text: task.text.clone(),
            date: task.date.map(|d| d.to_string()).unwrap_or_default(),
            priority: task.priority,
        };
        self.editing = Some(id);
        Ok(())
    }

    /// Validate the draft and apply it to the store.
    ///
    /// A rejected draft leaves both the store and the draft untouched. A stale
    /// editing target resets the editor without changing any task.
    pub fn commit(
        &mut self,
        store: &mut TaskStore,
        profile: Profile,
        today: NaiveDate,
    ) -> Result<CommitOutcome, TaskListError> {
        let date = self.validate(profile, today)?;

        let outcome = match self.editing {
            Some(id) => {
                let patch = if profile.has_details() {
                    TaskPatch {
                        text: Some(self.draft.text.clone()),
                        date: Some(date),
                        priority: Some(self.draft.priority),
                    }
                } else {
                    TaskPatch { text: Some(self.draft.text.clone()), ..TaskPatch::default() }
                };
                if let Err(e) = store.replace(id, &patch) {
                    debug!(id = id.0, "editing target vanished, resetting editor");
                    self.cancel();
                    return Err(e.into());
                }
                CommitOutcome::Updated(id)
            }
            None => {
                let new = if profile.has_details() {
                    NewTask { text: self.draft.text.clone(), date, priority: self.draft.priority }
                } else {
                    NewTask::text(self.draft.text.clone())
                };
                CommitOutcome::Inserted(store.insert(new))
            }
        };

        self.cancel();
        Ok(outcome)
    }

    /// Clear the draft and leave update mode.
    pub fn cancel(&mut self) {
        self.draft = Draft::default();
        self.editing = None;
    }

    /// Drop the draft if the task being edited was just removed.
    pub fn task_removed(&mut self, id: TaskId) {
        if self.editing == Some(id) {
            self.cancel();
        }
    }

    fn validate(&self, profile: Profile, today: NaiveDate) -> Result<Option<NaiveDate>, ValidationError> {
        if self.draft.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if !profile.has_details() {
            return Ok(None);
        }
        let raw = self.draft.date.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        parse_date_input(raw, today)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn draft(text: &str, date: &str, priority: Priority) -> Draft {
        Draft { text: text.into(), date: date.into(), priority }
    }

    #[test]
    fn test_blank_text_never_changes_store() {
        let mut store = TaskStore::new();
        let mut editor = TaskEditor::new();
        for text in ["", "   ", "\t\n"] {
            editor.draft = draft(text, "2024-01-20", Priority::High);
            let err = editor.commit(&mut store, Profile::Dated, today()).unwrap_err();
            assert!(matches!(err, TaskListError::Validation(ValidationError::EmptyText)));
            assert_eq!(store.len(), 0);
            assert_eq!(editor.draft.text, text);
        }
        editor.draft = draft(" ", "", Priority::Medium);
        assert!(editor.commit(&mut store, Profile::Basic, today()).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_dated_profile_requires_valid_date() {
        let mut store = TaskStore::new();
        let mut editor = TaskEditor::new();
        editor.draft = draft("pay rent", "  ", Priority::Medium);
        assert!(matches!(
            editor.commit(&mut store, Profile::Dated, today()),
            Err(TaskListError::Validation(ValidationError::MissingDate))
        ));
        editor.draft.date = "someday".into();
        assert!(matches!(
            editor.commit(&mut store, Profile::Dated, today()),
            Err(TaskListError::Validation(ValidationError::InvalidDate(d))) if d == "someday"
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_out_of_range_relative_date_is_invalid() {
        let mut store = TaskStore::new();
        let mut editor = TaskEditor::new();
        for date in ["in 999999999d", "in 99999999999999w"] {
            editor.draft = draft("far future", date, Priority::Low);
            assert!(matches!(
                editor.commit(&mut store, Profile::Dated, today()),
                Err(TaskListError::Validation(ValidationError::InvalidDate(d))) if d == date
            ));
            assert_eq!(editor.draft.text, "far future");
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_commit_resets_draft() {
        let mut store = TaskStore::new();
        let mut editor = TaskEditor::new();
        editor.draft = draft("pay rent", "tomorrow", Priority::High);
        let outcome = editor.commit(&mut store, Profile::Dated, today()).unwrap();
        assert_eq!(outcome, CommitOutcome::Inserted(TaskId(1)));

        let task = &store.tasks()[0];
        assert_eq!(task.text, "pay rent");
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2024, 1, 16));
        assert_eq!(task.priority, Priority::High);
        assert!(!task.completed);
        assert_eq!(editor.draft, Draft::default());
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_basic_profile_ignores_date_and_priority() {
        let mut store = TaskStore::new();
        let mut editor = TaskEditor::new();
        editor.draft = draft("water plants", "garbage", Priority::Low);
        editor.commit(&mut store, Profile::Basic, today()).unwrap();
        let task = &store.tasks()[0];
        assert_eq!(task.date, None);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_edit_commit_updates_in_place() {
        let mut store = TaskStore::new();
        store.insert(NewTask::text("first"));
        let id = store.insert(NewTask::text("second"));
        store.toggle_completed(id).unwrap();

        let mut editor = TaskEditor::new();
        editor.start_edit(&store, id).unwrap();
        assert_eq!(editor.draft.text, "second");
        assert_eq!(editor.editing(), Some(id));

        editor.draft.text = "second, revised".into();
        editor.draft.date = "2024-02-01".into();
        let outcome = editor.commit(&mut store, Profile::Dated, today()).unwrap();
        assert_eq!(outcome, CommitOutcome::Updated(id));
        assert_eq!(store.len(), 2);
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "second, revised");
        assert!(task.completed);
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_basic_edit_only_patches_text() {
        let mut store = TaskStore::new();
        let id = store.insert(NewTask {
            text: "dated".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 5),
            priority: Priority::Low,
        });
        let mut editor = TaskEditor::new();
        editor.start_edit(&store, id).unwrap();
        editor.draft.text = "renamed".into();
        editor.commit(&mut store, Profile::Basic, today()).unwrap();
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "renamed");
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2024, 5, 5));
        assert_eq!(task.priority, Priority::Low);
    }

    #[test]
    fn test_stale_target_resets_without_update() {
        let mut store = TaskStore::new();
        let id = store.insert(NewTask::text("doomed"));
        store.insert(NewTask::text("survivor"));

        let mut editor = TaskEditor::new();
        editor.start_edit(&store, id).unwrap();
        editor.draft.text = "edited".into();
        store.remove(id).unwrap();

        let before = store.clone();
        let err = editor.commit(&mut store, Profile::Basic, today()).unwrap_err();
        assert!(matches!(err, TaskListError::Store(StoreError::UnknownTask(t)) if t == id));
        assert_eq!(store, before);
        assert_eq!(editor.draft, Draft::default());
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_task_removed_only_cancels_matching_target() {
        let mut store = TaskStore::new();
        let a = store.insert(NewTask::text("a"));
        let b = store.insert(NewTask::text("b"));
        let mut editor = TaskEditor::new();
        editor.start_edit(&store, a).unwrap();

        editor.task_removed(b);
        assert_eq!(editor.editing(), Some(a));
        editor.task_removed(a);
        assert_eq!(editor.editing(), None);
        assert_eq!(editor.draft, Draft::default());
    }

    #[test]
    fn test_start_edit_unknown_id_leaves_editor() {
        let store = TaskStore::new();
        let mut editor = TaskEditor::new();
        editor.draft.text = "typing".into();
        assert_eq!(
            editor.start_edit(&store, TaskId(7)),
            Err(StoreError::UnknownTask(TaskId(7)))
        );
        assert_eq!(editor.draft.text, "typing");
    }
}
