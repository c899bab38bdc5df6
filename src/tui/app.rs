//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and coordinates between
//! the task list, the add/edit form, the search prompt and dialogs.

use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::warn;

use crate::dates::format_due_relative;
use crate::editor::CommitOutcome;
use crate::error::TaskListError;
use crate::task::TaskId;
use crate::tui::{
    colors::{priority_color, DARK_RED, SLATE},
    enums::AppState,
    input::InputField,
    task_form::{TaskForm, DATE_FIELD, PRIORITY_FIELD, TEXT_FIELD},
    utils::centered_rect,
};
use crate::view::TaskListView;

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    view: TaskListView,
    table_state: TableState,
    /// Ids of the displayed rows, in display order.
    visible: Vec<TaskId>,
    task_form: TaskForm,
    search_input: InputField,
    confirm_target: Option<TaskId>,
    status_message: String,
    today: NaiveDate,
}

impl App {
    pub fn new(view: TaskListView) -> Self {
        Self::with_today(view, Local::now().date_naive())
    }

    /// Create an app pinned to a given calendar date.
    pub fn with_today(view: TaskListView, today: NaiveDate) -> Self {
        let task_form = TaskForm::from_draft(&view.editor().draft, view.profile());
        let mut app = App {
            state: AppState::TaskList,
            view,
            table_state: TableState::default(),
            visible: Vec::new(),
            task_form,
            search_input: InputField::new(),
            confirm_target: None,
            status_message: String::new(),
            today,
        };
        app.update_visible();
        app
    }

    pub fn view(&self) -> &TaskListView {
        &self.view
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Ids of the rows currently on screen.
    pub fn visible(&self) -> &[TaskId] {
        &self.visible
    }

    /// Recompute the displayed rows, keeping the selection on the same task
    /// when it is still visible.
    fn update_visible(&mut self) {
        let old_selected = self.selected_id();
        self.visible = self.view.rows(self.today).iter().map(|r| r.id()).collect();
        self.select_id(old_selected);
    }

    fn select_id(&mut self, id: Option<TaskId>) {
        let idx = id.and_then(|id| self.visible.iter().position(|&v| v == id));
        match idx {
            Some(i) => self.table_state.select(Some(i)),
            None if self.visible.is_empty() => self.table_state.select(None),
            None => {
                let keep = self.table_state.selected().unwrap_or(0).min(self.visible.len() - 1);
                self.table_state.select(Some(keep));
            }
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.table_state
            .selected()
            .and_then(|idx| self.visible.get(idx))
            .copied()
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn report(&mut self, context: &str, e: TaskListError) {
        warn!(error = %e, "{context}");
        self.set_status_message(format!("{context}: {e}"));
    }

    fn open_form(&mut self, state: AppState) {
        self.task_form = TaskForm::from_draft(&self.view.editor().draft, self.view.profile());
        self.state = state;
    }

    /// Handle one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.status_message.clear();
        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key),
            AppState::AddTask | AppState::EditTask => self.handle_form_input(key),
            AppState::Search => self.handle_search_input(key),
            AppState::Help => self.state = AppState::TaskList,
            AppState::Confirm => self.handle_confirm_input(key),
        }
        false
    }

    fn handle_task_list_input(&mut self, key: KeyCode) -> bool {
        let profile = self.view.profile();
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.view.query().search.is_empty() {
                    return true;
                }
                self.view.set_search("");
                self.update_visible();
                self.set_status_message("Search cleared");
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.table_state.selected() {
                    self.table_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.table_state.selected() {
                    if selected + 1 < self.visible.len() {
                        self.table_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Char('a') => {
                self.view.cancel_edit();
                self.open_form(AppState::AddTask);
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    match self.view.start_edit(id) {
                        Ok(()) => self.open_form(AppState::EditTask),
                        Err(e) => self.report("Cannot edit", e),
                    }
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('c') => {
                if let Some(id) = self.selected_id() {
                    match self.view.toggle(id) {
                        Ok(true) => self.set_status_message("Task completed"),
                        Ok(false) => self.set_status_message("Task reopened"),
                        Err(e) => self.report("Cannot toggle", e),
                    }
                    self.update_visible();
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.confirm_target = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('f') if profile.has_query() => {
                let next = self.view.query().filter.next();
                self.view.set_filter(next);
                self.update_visible();
                self.set_status_message(format!(
                    "Filter: {} ({} tasks)",
                    next.label(),
                    self.visible.len()
                ));
            }
            KeyCode::Char('/') if profile.has_query() => {
                self.search_input = InputField::with_value(&self.view.query().search);
                self.state = AppState::Search;
            }
            KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::F(1) => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        false
    }

    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.view.cancel_edit();
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Home => self.task_form.handle_home(),
            KeyCode::End => self.task_form.handle_end(),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        self.view.editor_mut().draft = self.task_form.to_draft();
        match self.view.commit(self.today) {
            Ok(outcome) => {
                let (id, msg) = match outcome {
                    CommitOutcome::Inserted(id) => (id, format!("Added task #{id}")),
                    CommitOutcome::Updated(id) => (id, format!("Updated task #{id}")),
                };
                self.state = AppState::TaskList;
                self.update_visible();
                self.select_id(Some(id));
                self.set_status_message(msg);
            }
            // Keep the form open so the draft can be corrected.
            Err(TaskListError::Validation(e)) => self.set_status_message(e.to_string()),
            Err(e) => {
                self.state = AppState::TaskList;
                self.update_visible();
                self.report("Save failed", e);
            }
        }
    }

    fn handle_search_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.search_input = InputField::new();
                self.state = AppState::TaskList;
            }
            KeyCode::Enter => {
                self.state = AppState::TaskList;
                self.set_status_message(format!(
                    "Search '{}' ({} tasks)",
                    self.search_input.value,
                    self.visible.len()
                ));
                return;
            }
            KeyCode::Backspace => self.search_input.handle_backspace(),
            KeyCode::Left => self.search_input.move_cursor_left(),
            KeyCode::Right => self.search_input.move_cursor_right(),
            KeyCode::Char(c) => self.search_input.handle_char(c),
            _ => return,
        }
        self.view.set_search(self.search_input.value.clone());
        self.update_visible();
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        let target = self.confirm_target.take();
        self.state = AppState::TaskList;
        if !matches!(key, KeyCode::Char('y') | KeyCode::Char('Y')) {
            self.set_status_message("Delete cancelled");
            return;
        }
        if let Some(id) = target {
            match self.view.delete(id) {
                Ok(task) => self.set_status_message(format!("Deleted '{}'", task.text)),
                Err(e) => self.report("Cannot delete", e),
            }
            self.update_visible();
        }
    }

    /// Render the header, progress gauge and task table.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let profile = self.view.profile();
        let mut context = vec![
            Span::styled("TODO LIST", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                self.view.storage_description(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ];
        if profile.has_query() {
            let query = self.view.query();
            context.push(Span::raw(format!("  Filter: {}", query.filter.label())));
            if !query.search.is_empty() {
                context.push(Span::raw(format!("  Search: '{}'", query.search)));
            }
        }
        let header = Paragraph::new(Line::from(context))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let progress = self.view.progress();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .percent(u16::from(progress.percent))
            .label(format!("{}% Completed", progress.percent));
        f.render_widget(gauge, chunks[1]);

        let details = profile.has_details();
        let headers: &[&str] = if details {
            &["Done", "Priority", "Due", "Task"]
        } else {
            &["Done", "Task"]
        };
        let header = Row::new(
            headers
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(SLATE).fg(Color::White))
        .height(1);

        let today = self.today;
        let rows: Vec<Row> = self
            .visible
            .iter()
            .filter_map(|&id| self.view.get(id))
            .map(|task| {
                let done = if task.completed { "[x]" } else { "[ ]" };
                let style = if task.completed {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(Color::White)
                };
                let cells = if details {
                    vec![
                        Cell::from(done),
                        Cell::from(task.priority.label())
                            .style(Style::default().fg(priority_color(task.priority))),
                        Cell::from(format_due_relative(task.date, today)),
                        Cell::from(task.text.clone()),
                    ]
                } else {
                    vec![Cell::from(done), Cell::from(task.text.clone())]
                };
                Row::new(cells).style(style)
            })
            .collect();

        let widths: Vec<Constraint> = if details {
            vec![
                Constraint::Length(5),
                Constraint::Length(9),
                Constraint::Length(11),
                Constraint::Min(20),
            ]
        } else {
            vec![Constraint::Length(5), Constraint::Min(20)]
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{}) - Press 'h' for help",
                self.visible.len(),
                self.view.tasks().len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[2], &mut self.table_state);
    }

    /// Render the add/edit form as a popup over the task list.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect, is_edit: bool) {
        let details = self.view.profile().has_details();
        let popup = centered_rect(70, if details { 70 } else { 40 }, area);
        f.render_widget(Clear, popup);

        let title = if is_edit { "Update Task" } else { "Add Task" };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let mut constraints = vec![Constraint::Length(3)];
        if details {
            constraints.push(Constraint::Length(3));
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(0));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let focus = |active: bool| {
            if active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }
        };

        let form = &self.task_form;
        f.render_widget(
            Paragraph::new(form.text.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Task")
                    .border_style(focus(form.current_field == TEXT_FIELD)),
            ),
            chunks[0],
        );

        if details {
            f.render_widget(
                Paragraph::new(form.date.value.as_str()).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Due (YYYY-MM-DD, today, tomorrow, in 3d)")
                        .border_style(focus(form.current_field == DATE_FIELD)),
                ),
                chunks[1],
            );

            let selector: Vec<Span> = form
                .priorities
                .iter()
                .enumerate()
                .flat_map(|(i, p)| {
                    let style = if i == form.priority {
                        Style::default().fg(Color::Black).bg(priority_color(*p))
                    } else {
                        Style::default().fg(priority_color(*p))
                    };
                    [Span::styled(format!(" {} ", p.label()), style), Span::raw(" ")]
                })
                .collect();
            f.render_widget(
                Paragraph::new(Line::from(selector)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Priority (Left/Right)")
                        .border_style(focus(form.current_field == PRIORITY_FIELD)),
                ),
                chunks[2],
            );
        }

        let hint = Paragraph::new("Tab: next field  Enter: save  Esc: cancel")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint, chunks[chunks.len() - 1]);

        let (field, chunk) = match form.current_field {
            TEXT_FIELD => (Some(&form.text), chunks[0]),
            DATE_FIELD if details => (Some(&form.date), chunks[1]),
            _ => (None, chunks[0]),
        };
        if let Some(field) = field {
            let x = (chunk.x + 1 + field.cursor as u16).min(chunk.right().saturating_sub(2));
            f.set_cursor_position((x, chunk.y + 1));
        }
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut help_text = vec![
            Line::from(Span::styled("Task List Help", bold)),
            Line::from(""),
            Line::from(Span::styled("Task List:", bold)),
            Line::from("  Up/Down, k/j   Move selection"),
            Line::from("  a              Add new task"),
            Line::from("  e / Enter      Edit selected task"),
            Line::from("  Space / c      Toggle completed"),
            Line::from("  d / Delete     Delete selected task"),
        ];
        if self.view.profile().has_query() {
            help_text.push(Line::from("  f              Cycle filter (All, Completed, Pending, Due Today)"));
            help_text.push(Line::from("  /              Search task text"));
        }
        help_text.extend([
            Line::from("  h / ? / F1     Show this help"),
            Line::from("  q / Esc        Quit (Esc clears an active search first)"),
            Line::from(""),
            Line::from(Span::styled("Form:", bold)),
            Line::from("  Tab / Up/Down  Move between fields"),
            Line::from("  Left/Right     Move cursor or change priority"),
            Line::from("  Enter          Save task"),
            Line::from("  Esc            Cancel"),
        ]);

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for deletion.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let label = self
            .confirm_target
            .and_then(|id| self.view.get(id))
            .map(|t| t.text.clone())
            .unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(label),
            Line::from(""),
            Line::from("Press 'y' to confirm, any other key to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if self.state == AppState::Search {
            format!("Search: {} (Enter to keep, Esc to clear)", self.search_input.value)
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} | a: add  e: edit  space: toggle  d: delete  h: help",
                    self.visible.len()
                ),
                AppState::AddTask => "Add Task".to_string(),
                AppState::EditTask => "Update Task".to_string(),
                AppState::Search => String::new(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(SLATE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);

        if self.state == AppState::Search {
            let x = area.x + "Search: ".len() as u16 + self.search_input.cursor as u16;
            f.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::TaskList | AppState::Search => self.render_task_list(f, chunks[0]),
            AppState::AddTask => {
                self.render_task_list(f, chunks[0]);
                self.render_task_form(f, chunks[0], false);
            }
            AppState::EditTask => {
                self.render_task_list(f, chunks[0]);
                self.render_task_form(f, chunks[0], true);
            }
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Confirm => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            let today = Local::now().date_naive();
            if today != self.today {
                self.today = today;
                self.update_visible();
            }

            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
