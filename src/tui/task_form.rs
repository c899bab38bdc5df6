//! Task form handling for the terminal user interface.
//!
//! The form mirrors the editor draft while a task is being created or edited.
//! Field order is text, due date, then priority; the basic profile only shows
//! the text field.

use crate::editor::Draft;
use crate::fields::{Priority, Profile};
use crate::tui::input::InputField;

pub const TEXT_FIELD: usize = 0;
pub const DATE_FIELD: usize = 1;
pub const PRIORITY_FIELD: usize = 2;

/// Task form for editing fields
pub struct TaskForm {
    pub text: InputField,
    pub date: InputField,
    pub priority: usize,
    pub current_field: usize,
    pub priorities: Vec<Priority>,
    profile: Profile,
}

impl TaskForm {
    /// Populate a form from the editor draft.
    pub fn from_draft(draft: &Draft, profile: Profile) -> Self {
        let priorities = Priority::ALL.to_vec();
        let priority = priorities.iter().position(|&p| p == draft.priority).unwrap_or(1);
        let mut form = Self {
            text: InputField::with_value(&draft.text),
            date: InputField::with_value(&draft.date),
            priority,
            current_field: TEXT_FIELD,
            priorities,
            profile,
        };
        form.update_active_field();
        form
    }

    /// The draft described by the current field values.
    pub fn to_draft(&self) -> Draft {
        Draft {
            text: self.text.value.clone(),
            date: self.date.value.clone(),
            priority: self.selected_priority(),
        }
    }

    pub fn selected_priority(&self) -> Priority {
        self.priorities.get(self.priority).copied().unwrap_or_default()
    }

    /// Get the total number of fields (input fields + selectors).
    pub fn field_count(&self) -> usize {
        if self.profile.has_details() {
            3
        } else {
            1
        }
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.field_count();
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            self.field_count() - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Update which field is currently active for editing.
    pub fn update_active_field(&mut self) {
        self.text.active = self.current_field == TEXT_FIELD;
        self.date.active = self.current_field == DATE_FIELD;
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TEXT_FIELD => Some(&mut self.text),
            DATE_FIELD => Some(&mut self.date),
            _ => None,
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    pub fn handle_home(&mut self) {
        if let Some(field) = self.active_input() {
            field.move_home();
        }
    }

    pub fn handle_end(&mut self) {
        if let Some(field) = self.active_input() {
            field.move_end();
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == PRIORITY_FIELD {
            let n = self.priorities.len();
            self.priority = if right {
                (self.priority + 1) % n
            } else {
                (self.priority + n - 1) % n
            };
        } else if let Some(field) = self.active_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }
}
