//! Bug list view.
//!
//! A table of bugs with a selectable row and a column picker. User ids are
//! shown as display names once the user list is known.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::api::{Bug, ReferenceOptions};
use crate::ui::theme::theme;

/// Actions returned from the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// Open the edit form for a bug.
    EditBug(Bug),
    /// Open the create form.
    NewBug,
    /// Reload the bug list.
    Refresh,
    /// Cycle the theme preference.
    CycleTheme,
    /// Quit the application.
    Quit,
}

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Title,
    Status,
    Assignee,
    Creator,
    CreatedAt,
    BugType,
    Priority,
    Iteration,
    PlannedStart,
    PlannedEnd,
    Completion,
    Verifier,
    Project,
    Severity,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Column; 15] = [
        Column::Id,
        Column::Title,
        Column::Status,
        Column::Assignee,
        Column::Creator,
        Column::CreatedAt,
        Column::BugType,
        Column::Priority,
        Column::Iteration,
        Column::PlannedStart,
        Column::PlannedEnd,
        Column::Completion,
        Column::Verifier,
        Column::Project,
        Column::Severity,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Title => "Title",
            Column::Status => "Status",
            Column::Assignee => "Assignee",
            Column::Creator => "Creator",
            Column::CreatedAt => "Created",
            Column::BugType => "Type",
            Column::Priority => "Priority",
            Column::Iteration => "Iteration",
            Column::PlannedStart => "Start",
            Column::PlannedEnd => "End",
            Column::Completion => "Completed",
            Column::Verifier => "Verifier",
            Column::Project => "Project",
            Column::Severity => "Severity",
        }
    }

    /// Whether the column shows before the user changes anything.
    pub fn visible_by_default(&self) -> bool {
        !matches!(
            self,
            Column::Verifier | Column::Project | Column::Severity | Column::PlannedEnd
        )
    }

    fn width(&self) -> Constraint {
        match self {
            Column::Id => Constraint::Length(8),
            Column::Title => Constraint::Min(20),
            Column::Status => Constraint::Length(8),
            Column::Assignee
            | Column::Creator
            | Column::Verifier
            | Column::Iteration
            | Column::Project => Constraint::Length(12),
            Column::CreatedAt | Column::PlannedStart | Column::PlannedEnd | Column::Completion => {
                Constraint::Length(10)
            }
            Column::BugType | Column::Priority | Column::Severity => Constraint::Length(10),
        }
    }

    /// Text of this column for a bug.
    fn cell<'a>(&self, bug: &'a Bug, options: &'a ReferenceOptions) -> &'a str {
        let user = |id: &'a str| options.user_name(id).unwrap_or(id);
        match self {
            Column::Id => &bug.id,
            Column::Title => &bug.title,
            Column::Status => &bug.status,
            Column::Assignee => user(&bug.assignee),
            Column::Creator => user(&bug.creator),
            Column::CreatedAt => &bug.created_at,
            Column::BugType => &bug.bug_type,
            Column::Priority => &bug.priority,
            Column::Iteration => &bug.iteration,
            Column::PlannedStart => &bug.planned_start_date,
            Column::PlannedEnd => &bug.planned_end_date,
            Column::Completion => &bug.completion_date,
            Column::Verifier => user(&bug.verifier),
            Column::Project => &bug.project,
            Column::Severity => &bug.severity,
        }
    }
}

/// Which columns are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    visible: [bool; Column::ALL.len()],
}

impl Default for ColumnSet {
    fn default() -> Self {
        let mut visible = [false; Column::ALL.len()];
        for (slot, column) in visible.iter_mut().zip(Column::ALL) {
            *slot = column.visible_by_default();
        }
        Self { visible }
    }
}

impl ColumnSet {
    fn index(column: Column) -> usize {
        Column::ALL.iter().position(|c| *c == column).unwrap_or(0)
    }

    pub fn is_visible(&self, column: Column) -> bool {
        self.visible[Self::index(column)]
    }

    /// Toggle a column. The last visible column cannot be hidden.
    pub fn toggle(&mut self, column: Column) -> bool {
        let idx = Self::index(column);
        if self.visible[idx] && self.visible.iter().filter(|v| **v).count() == 1 {
            return false;
        }
        self.visible[idx] = !self.visible[idx];
        true
    }

    /// Visible columns in display order.
    pub fn visible(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| self.is_visible(*c))
            .collect()
    }
}

/// The bug list view.
pub struct ListView {
    table_state: TableState,
    columns: ColumnSet,
    picker_open: bool,
    picker_cursor: usize,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    /// Create a new list view.
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
            columns: ColumnSet::default(),
            picker_open: false,
            picker_cursor: 0,
        }
    }

    /// Get the selected row index.
    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    /// Keep the selection in range after the list changed.
    pub fn clamp_selection(&mut self, len: usize) {
        let selected = match (len, self.table_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
        self.table_state.select(selected);
    }

    /// Select the bug with this id, if present.
    pub fn select_id(&mut self, bugs: &[Bug], id: &str) {
        if let Some(idx) = bugs.iter().position(|b| b.id == id) {
            self.table_state.select(Some(idx));
        }
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent, bugs: &[Bug]) -> Option<ListAction> {
        if self.picker_open {
            self.handle_picker_input(key);
            return None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.move_selection(bugs.len(), 1);
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.move_selection(bugs.len(), -1);
                None
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => {
                if !bugs.is_empty() {
                    self.table_state.select(Some(0));
                }
                None
            }
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
                if !bugs.is_empty() {
                    self.table_state.select(Some(bugs.len() - 1));
                }
                None
            }
            (KeyCode::Enter, _) => self
                .table_state
                .selected()
                .and_then(|i| bugs.get(i))
                .map(|bug| ListAction::EditBug(bug.clone())),
            (KeyCode::Char('n'), KeyModifiers::NONE) => Some(ListAction::NewBug),
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(ListAction::Refresh),
            (KeyCode::Char('t'), KeyModifiers::NONE) => Some(ListAction::CycleTheme),
            (KeyCode::Char('c'), KeyModifiers::NONE) => {
                self.picker_open = true;
                self.picker_cursor = 0;
                None
            }
            (KeyCode::Char('q'), KeyModifiers::NONE) => Some(ListAction::Quit),
            _ => None,
        }
    }

    fn move_selection(&mut self, len: usize, delta: isize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    fn handle_picker_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.picker_cursor = (self.picker_cursor + 1).min(Column::ALL.len() - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.picker_cursor = self.picker_cursor.saturating_sub(1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.columns.toggle(Column::ALL[self.picker_cursor]);
            }
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => {
                self.picker_open = false;
            }
            _ => {}
        }
    }

    /// Render the table.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        bugs: &[Bug],
        options: &ReferenceOptions,
        focused: bool,
    ) {
        let t = theme();
        let columns = self.columns.visible();

        let block = Block::default()
            .title(Span::styled(format!(" Bugs ({}) ", bugs.len()), t.title_style(focused)))
            .borders(Borders::ALL)
            .border_style(t.border_style(focused));

        if bugs.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No bugs. Press 'n' to create one or 'r' to refresh.",
                Style::default().fg(t.muted),
            )))
            .block(block);
            frame.render_widget(empty, area);
        } else {
            let header = Row::new(columns.iter().map(|c| Cell::from(c.header())))
                .style(Style::default().fg(t.accent).add_modifier(Modifier::BOLD))
                .height(1);
            let rows = bugs.iter().map(|bug| {
                Row::new(columns.iter().map(|c| Cell::from(c.cell(bug, options))))
                    .style(Style::default().fg(t.fg))
            });
            let widths: Vec<Constraint> = columns.iter().map(Column::width).collect();

            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .column_spacing(1)
                .highlight_style(t.selection_style())
                .highlight_symbol("> ");

            self.clamp_selection(bugs.len());
            frame.render_stateful_widget(table, area, &mut self.table_state);
        }

        if self.picker_open {
            self.render_picker(frame, area);
        }
    }

    fn render_picker(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let height = (Column::ALL.len() as u16 + 2).min(area.height);
        let width = 28.min(area.width);
        let popup = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);

        let items: Vec<ListItem> = Column::ALL
            .iter()
            .map(|column| {
                let mark = if self.columns.is_visible(*column) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}", mark, column.header()))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(Span::styled(" Columns ", t.title_style(true)))
                    .borders(Borders::ALL)
                    .border_style(t.border_style(true)),
            )
            .style(Style::default().fg(t.fg))
            .highlight_style(t.selection_style());

        let mut state = ListState::default();
        state.select(Some(self.picker_cursor));
        frame.render_stateful_widget(list, popup, &mut state);
    }
}
