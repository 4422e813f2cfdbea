//! Bug form view for creating and editing bugs.
//!
//! Create mode renders as a centered modal over the bug list; edit mode as a
//! drawer on the right. Both share one field layout. Every widget change is
//! forwarded to the [`FormState`] reducer right away, so the state is always
//! what would be submitted.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing::debug;

use crate::api::{Bug, ReferenceOption, ReferenceOptions};
use crate::form::{
    format_tags, parse_date, parse_tags, sync_editor, DateRange, FormError, FormField, FormMode,
    FormMsg, FormState, Generation, Submission,
};
use crate::ui::components::{
    Dropdown, DropdownAction, DropdownItem, MultiSelect, MultiSelectAction, TextEditor, TextInput,
};
use crate::ui::theme::theme;

/// Actions returned from the bug form view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BugFormAction {
    /// Close the form without saving.
    Cancel,
    /// Save the payload.
    Submit(Submission),
    /// The form refused to submit.
    Rejected(FormError),
}

/// Focusable parts of the form, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Title,
    Description,
    BugType,
    Priority,
    Severity,
    Assignee,
    Verifier,
    Project,
    Iteration,
    Participants,
    Cc,
    Tags,
    PlannedStart,
    PlannedEnd,
    NotFixReason,
    CustomReason,
    Submit,
}

impl FormFocus {
    const ORDER: [FormFocus; 17] = [
        FormFocus::Title,
        FormFocus::Description,
        FormFocus::BugType,
        FormFocus::Priority,
        FormFocus::Severity,
        FormFocus::Assignee,
        FormFocus::Verifier,
        FormFocus::Project,
        FormFocus::Iteration,
        FormFocus::Participants,
        FormFocus::Cc,
        FormFocus::Tags,
        FormFocus::PlannedStart,
        FormFocus::PlannedEnd,
        FormFocus::NotFixReason,
        FormFocus::CustomReason,
        FormFocus::Submit,
    ];

    fn is_text(self) -> bool {
        matches!(
            self,
            FormFocus::Title
                | FormFocus::Tags
                | FormFocus::PlannedStart
                | FormFocus::PlannedEnd
                | FormFocus::CustomReason
        )
    }
}

/// Field rectangles from the last render, used to place popups.
#[derive(Debug, Clone, Copy, Default)]
struct FieldAreas {
    screen: Rect,
    bug_type: Rect,
    priority: Rect,
    severity: Rect,
    assignee: Rect,
    verifier: Rect,
    project: Rect,
    iteration: Rect,
    participants: Rect,
    cc: Rect,
    not_fix_reason: Rect,
}

/// The bug form view.
pub struct BugFormView {
    state: FormState,
    focus: FormFocus,
    title_input: TextInput,
    description: TextEditor,
    bug_type: Dropdown,
    priority: Dropdown,
    severity: Dropdown,
    assignee: Dropdown,
    verifier: Dropdown,
    project: Dropdown,
    iteration: Dropdown,
    participants: MultiSelect,
    cc: MultiSelect,
    tags_input: TextInput,
    start_input: TextInput,
    end_input: TextInput,
    not_fix_reason: Dropdown,
    custom_reason_input: TextInput,
    date_error: Option<String>,
    areas: FieldAreas,
}

impl Default for BugFormView {
    fn default() -> Self {
        Self::new(FormState::default())
    }
}

impl BugFormView {
    /// Create a closed form view around a state container.
    pub fn new(state: FormState) -> Self {
        Self {
            state,
            focus: FormFocus::Title,
            title_input: TextInput::new().placeholder("Enter bug title..."),
            description: TextEditor::empty().placeholder("Describe the bug (markdown)..."),
            bug_type: Dropdown::new("Type"),
            priority: Dropdown::new("Priority"),
            severity: Dropdown::new("Severity"),
            assignee: Dropdown::new("Assignee"),
            verifier: Dropdown::new("Verifier"),
            project: Dropdown::new("Project"),
            iteration: Dropdown::new("Iteration"),
            participants: MultiSelect::new("Participants"),
            cc: MultiSelect::new("CC"),
            tags_input: TextInput::new().placeholder("tag1, tag2"),
            start_input: TextInput::new().placeholder("YYYY-MM-DD"),
            end_input: TextInput::new().placeholder("YYYY-MM-DD"),
            not_fix_reason: Dropdown::new("Not-fix reason"),
            custom_reason_input: TextInput::new().placeholder("Explain the reason..."),
            date_error: None,
            areas: FieldAreas::default(),
        }
    }

    /// Get the state container.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Check if the form is open.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Get the focused part.
    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    /// Open for a new bug. Returns the option load generation.
    pub fn open_create(&mut self) -> Generation {
        let generation = self.state.open_create();
        self.after_open();
        generation
    }

    /// Open for an existing bug. Returns the option load generation.
    pub fn open_edit(&mut self, bug: Bug) -> Generation {
        let generation = self.state.open_edit(bug);
        self.after_open();
        generation
    }

    /// Close the form and drop pending option loads.
    pub fn close(&mut self) {
        self.state.close();
        self.collapse_popups();
    }

    /// Set the caller's saving flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.state.set_loading(loading);
    }

    /// Apply a resolved option load; stale or failed loads are ignored.
    pub fn apply_options(
        &mut self,
        generation: Generation,
        result: Result<ReferenceOptions, String>,
    ) -> bool {
        if !self.state.apply_options(generation, result) {
            return false;
        }
        self.load_items();
        self.sync_custom_reason();
        self.ensure_focus_visible();
        true
    }

    fn after_open(&mut self) {
        self.focus = FormFocus::Title;
        self.date_error = None;
        self.collapse_popups();
        self.load_items();
        self.load_widgets();
    }

    fn collapse_popups(&mut self) {
        for dropdown in self.dropdowns_mut() {
            dropdown.collapse();
        }
        self.participants.collapse();
        self.cc.collapse();
    }

    fn dropdowns_mut(&mut self) -> [&mut Dropdown; 8] {
        [
            &mut self.bug_type,
            &mut self.priority,
            &mut self.severity,
            &mut self.assignee,
            &mut self.verifier,
            &mut self.project,
            &mut self.iteration,
            &mut self.not_fix_reason,
        ]
    }

    /// Copy option lists into the widgets.
    fn load_items(&mut self) {
        fn to_items(list: &[ReferenceOption]) -> Vec<DropdownItem> {
            list.iter().map(DropdownItem::from).collect()
        }

        let options = self.state.options();
        let users = to_items(&options.users);
        let projects = to_items(&options.projects);
        let iterations = to_items(&options.iterations);
        let priorities = to_items(&options.priorities);
        let severities = to_items(&options.severities);
        let bug_types = to_items(&options.bug_types);
        let reasons: Vec<DropdownItem> =
            options.not_fix_reasons.iter().map(DropdownItem::from).collect();

        self.assignee.set_items(users.clone());
        self.verifier.set_items(users.clone());
        self.participants.set_items(users.clone());
        self.cc.set_items(users);
        self.project.set_items(projects);
        self.iteration.set_items(iterations);
        self.priority.set_items(priorities);
        self.severity.set_items(severities);
        self.bug_type.set_items(bug_types);
        self.not_fix_reason.set_items(reasons);
    }

    /// Copy the state's values into the widgets.
    fn load_widgets(&mut self) {
        let v = self.state.values().clone();
        self.title_input.set_value(v.title);
        sync_editor(&mut self.description, &v.description);
        self.bug_type.set_selected(v.bug_type);
        self.priority.set_selected(v.priority);
        self.severity.set_selected(v.severity);
        self.assignee.set_selected(v.assignee);
        self.verifier.set_selected(v.verifier);
        self.project.set_selected(v.project);
        self.iteration.set_selected(v.iteration);
        self.participants.set_selected(v.participants);
        self.cc.set_selected(v.cc);
        self.tags_input.set_value(format_tags(&v.tags));
        let (start, end) = v.planned.map(|r| r.format()).unwrap_or_default();
        self.start_input.set_value(start);
        self.end_input.set_value(end);
        self.not_fix_reason.set_selected(v.not_fix_reason);
        self.custom_reason_input.set_value(v.custom_not_fix_reason);
    }

    /// Mirror the state's custom reason after the rule may have cleared it.
    fn sync_custom_reason(&mut self) {
        let value = &self.state.values().custom_not_fix_reason;
        if self.custom_reason_input.value() != value {
            self.custom_reason_input.set_value(value.clone());
        }
    }

    fn visible_fields(&self) -> Vec<FormFocus> {
        let custom = self.state.custom_reason_visible();
        FormFocus::ORDER
            .into_iter()
            .filter(|f| *f != FormFocus::CustomReason || custom)
            .collect()
    }

    fn move_focus(&mut self, forward: bool) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    fn ensure_focus_visible(&mut self) {
        if self.focus == FormFocus::CustomReason && !self.state.custom_reason_visible() {
            self.focus = FormFocus::NotFixReason;
        }
    }

    fn active_dropdown(&mut self) -> Option<&mut Dropdown> {
        let dropdown = match self.focus {
            FormFocus::BugType => &mut self.bug_type,
            FormFocus::Priority => &mut self.priority,
            FormFocus::Severity => &mut self.severity,
            FormFocus::Assignee => &mut self.assignee,
            FormFocus::Verifier => &mut self.verifier,
            FormFocus::Project => &mut self.project,
            FormFocus::Iteration => &mut self.iteration,
            FormFocus::NotFixReason => &mut self.not_fix_reason,
            _ => return None,
        };
        Some(dropdown)
    }

    fn active_multiselect(&mut self) -> Option<&mut MultiSelect> {
        match self.focus {
            FormFocus::Participants => Some(&mut self.participants),
            FormFocus::Cc => Some(&mut self.cc),
            _ => None,
        }
    }

    fn popup_open(&self) -> bool {
        [
            &self.bug_type,
            &self.priority,
            &self.severity,
            &self.assignee,
            &self.verifier,
            &self.project,
            &self.iteration,
            &self.not_fix_reason,
        ]
        .iter()
        .any(|d| d.is_expanded())
            || self.participants.is_expanded()
            || self.cc.is_expanded()
    }

    /// Handle keyboard input.
    ///
    /// Input is ignored while a save is in flight.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<BugFormAction> {
        if !self.state.is_open() || self.state.is_loading() {
            return None;
        }

        if self.popup_open() {
            self.handle_field_input(key);
            return None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => Some(BugFormAction::Cancel),
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => self.try_submit(),
            (KeyCode::Tab, KeyModifiers::NONE) => {
                self.move_focus(true);
                None
            }
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => {
                self.move_focus(false);
                None
            }
            (KeyCode::Enter, KeyModifiers::NONE) if self.focus == FormFocus::Submit => {
                self.try_submit()
            }
            (KeyCode::Enter, KeyModifiers::NONE) if self.focus.is_text() => {
                self.move_focus(true);
                None
            }
            _ => {
                self.handle_field_input(key);
                None
            }
        }
    }

    /// Insert pasted text into the focused text field.
    pub fn handle_paste(&mut self, text: &str) {
        if !self.state.is_open() || self.state.is_loading() {
            return;
        }
        let changed = match self.focus {
            FormFocus::Description => self.description.insert_str(text),
            _ => match self.focused_input() {
                Some(input) => input.insert_str(text),
                None => false,
            },
        };
        if changed {
            self.commit_text(self.focus);
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            FormFocus::Title => Some(&mut self.title_input),
            FormFocus::Tags => Some(&mut self.tags_input),
            FormFocus::PlannedStart => Some(&mut self.start_input),
            FormFocus::PlannedEnd => Some(&mut self.end_input),
            FormFocus::CustomReason => Some(&mut self.custom_reason_input),
            _ => None,
        }
    }

    fn handle_field_input(&mut self, key: KeyEvent) {
        let focus = self.focus;

        if let Some(dropdown) = self.active_dropdown() {
            if let Some(DropdownAction::Select(id)) = dropdown.handle_input(key) {
                self.commit_choice(focus, id);
            }
            return;
        }

        if let Some(select) = self.active_multiselect() {
            if let Some(MultiSelectAction::Changed(ids)) = select.handle_input(key) {
                let msg = if focus == FormFocus::Participants {
                    FormMsg::SetParticipants(ids)
                } else {
                    FormMsg::SetCc(ids)
                };
                self.state.update(msg);
            }
            return;
        }

        let changed = match focus {
            FormFocus::Description => self.description.handle_input(key),
            FormFocus::Submit => false,
            _ => match self.focused_input() {
                Some(input) => input.handle_input(key),
                None => false,
            },
        };
        if changed {
            self.commit_text(focus);
        }
    }

    fn commit_choice(&mut self, focus: FormFocus, id: Option<String>) {
        let msg = match focus {
            FormFocus::BugType => FormMsg::SetBugType(id),
            FormFocus::Priority => FormMsg::SetPriority(id),
            FormFocus::Severity => FormMsg::SetSeverity(id),
            FormFocus::Assignee => FormMsg::SetAssignee(id),
            FormFocus::Verifier => FormMsg::SetVerifier(id),
            FormFocus::Project => FormMsg::SetProject(id),
            FormFocus::Iteration => FormMsg::SetIteration(id),
            FormFocus::NotFixReason => FormMsg::SetNotFixReason(id),
            _ => return,
        };
        self.state.update(msg);
        if focus == FormFocus::NotFixReason {
            self.sync_custom_reason();
        }
    }

    fn commit_text(&mut self, focus: FormFocus) {
        match focus {
            FormFocus::Title => self
                .state
                .update(FormMsg::SetTitle(self.title_input.value().to_string())),
            FormFocus::Description => self
                .state
                .update(FormMsg::SetDescription(self.description.content())),
            FormFocus::Tags => self
                .state
                .update(FormMsg::SetTags(parse_tags(self.tags_input.value()))),
            FormFocus::PlannedStart | FormFocus::PlannedEnd => {
                self.date_error = None;
                let range = self.typed_range();
                self.state.update(FormMsg::SetPlannedRange(range));
            }
            FormFocus::CustomReason => {
                self.state.update(FormMsg::SetCustomNotFixReason(
                    self.custom_reason_input.value().to_string(),
                ));
                self.sync_custom_reason();
            }
            _ => {}
        }
    }

    /// The range typed into the date inputs, if both hold a date.
    ///
    /// A pair matching the stored range keeps its stored order; anything
    /// else is ordered.
    fn typed_range(&self) -> Option<DateRange> {
        let start = parse_date(self.start_input.value())?;
        let end = parse_date(self.end_input.value())?;
        Some(self.entered_range(start, end))
    }

    fn entered_range(&self, start: NaiveDate, end: NaiveDate) -> DateRange {
        match self.state.values().planned {
            Some(stored) if stored.start() == start && stored.end() == end => stored,
            _ => DateRange::new(start, end),
        }
    }

    /// Check the date inputs before a submit.
    ///
    /// Text that is not a date blocks the submit. A range with only one
    /// endpoint is dropped and both dates are sent empty.
    fn check_dates(&mut self) -> bool {
        let start_text = self.start_input.value().trim();
        let end_text = self.end_input.value().trim();
        let start = parse_date(start_text);
        let end = parse_date(end_text);
        let invalid = if !start_text.is_empty() && start.is_none() {
            Some(FormFocus::PlannedStart)
        } else if !end_text.is_empty() && end.is_none() {
            Some(FormFocus::PlannedEnd)
        } else {
            None
        };

        if let Some(focus) = invalid {
            self.date_error = Some("Planned dates must be YYYY-MM-DD".to_string());
            self.focus = focus;
            return false;
        }

        let range = match (start, end) {
            (Some(start), Some(end)) => Some(self.entered_range(start, end)),
            (None, None) => None,
            _ => {
                debug!("Only one planned date given, sending neither");
                None
            }
        };
        self.date_error = None;
        self.state.update(FormMsg::SetPlannedRange(range));
        true
    }

    fn try_submit(&mut self) -> Option<BugFormAction> {
        if !self.check_dates() {
            return None;
        }
        match self.state.submit() {
            Ok(submission) => Some(BugFormAction::Submit(submission)),
            Err(e) => {
                if let FormError::Validation(errors) = &e {
                    if errors.iter().any(|error| error.field == FormField::Title) {
                        self.focus = FormFocus::Title;
                    }
                }
                debug!(error = %e, "Submit refused");
                Some(BugFormAction::Rejected(e))
            }
        }
    }

    /// Render the form over the given area.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.state.is_open() {
            return;
        }
        let t = theme();

        let (panel, title) = match self.state.mode() {
            FormMode::Create => (
                centered_rect(area, 84, 38),
                " New Bug ".to_string(),
            ),
            FormMode::Edit => {
                let id = self.state.original().map_or("", |b| b.id.as_str());
                (drawer_rect(area, 72), format!(" Edit {} ", id))
            }
        };

        frame.render_widget(Clear, panel);
        let block = Block::default()
            .title(Span::styled(
                title,
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let rows = Layout::vertical([
            Constraint::Length(3), // Title
            Constraint::Min(4),    // Description
            Constraint::Length(3), // Type / Priority / Severity
            Constraint::Length(3), // Assignee / Verifier
            Constraint::Length(3), // Project / Iteration
            Constraint::Length(3), // Participants / CC
            Constraint::Length(3), // Tags
            Constraint::Length(3), // Planned start / end
            Constraint::Length(3), // Not-fix reason / custom reason
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Submit button
        ])
        .horizontal_margin(1)
        .split(inner);

        let halves = |r: Rect| Layout::horizontal([Constraint::Ratio(1, 2); 2]).split(r);
        let thirds = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(rows[2]);
        let people = halves(rows[3]);
        let planning = halves(rows[4]);
        let lists = halves(rows[5]);
        let dates = halves(rows[7]);
        let reasons = halves(rows[8]);

        let f = self.focus;
        self.title_input
            .render_with_label(frame, rows[0], "Title *", f == FormFocus::Title);
        self.render_field_error(frame, rows[0], FormField::Title);
        self.description
            .render(frame, rows[1], f == FormFocus::Description, "Description");
        self.bug_type.render(frame, thirds[0], f == FormFocus::BugType);
        self.priority.render(frame, thirds[1], f == FormFocus::Priority);
        self.severity.render(frame, thirds[2], f == FormFocus::Severity);
        self.assignee.render(frame, people[0], f == FormFocus::Assignee);
        self.verifier.render(frame, people[1], f == FormFocus::Verifier);
        self.project.render(frame, planning[0], f == FormFocus::Project);
        self.iteration.render(frame, planning[1], f == FormFocus::Iteration);
        self.participants
            .render(frame, lists[0], f == FormFocus::Participants);
        self.cc.render(frame, lists[1], f == FormFocus::Cc);
        self.tags_input
            .render_with_label(frame, rows[6], "Tags", f == FormFocus::Tags);
        self.start_input
            .render_with_label(frame, dates[0], "Planned start", f == FormFocus::PlannedStart);
        self.end_input
            .render_with_label(frame, dates[1], "Planned end", f == FormFocus::PlannedEnd);
        self.not_fix_reason
            .render(frame, reasons[0], f == FormFocus::NotFixReason);
        if self.state.custom_reason_visible() {
            self.custom_reason_input.render_with_label(
                frame,
                reasons[1],
                "Custom reason",
                f == FormFocus::CustomReason,
            );
        }

        self.render_status(frame, rows[9]);
        self.render_submit_button(frame, rows[10], f == FormFocus::Submit);

        self.areas = FieldAreas {
            screen: area,
            bug_type: thirds[0],
            priority: thirds[1],
            severity: thirds[2],
            assignee: people[0],
            verifier: people[1],
            project: planning[0],
            iteration: planning[1],
            participants: lists[0],
            cc: lists[1],
            not_fix_reason: reasons[0],
        };
        self.render_popups(frame);
    }

    fn render_popups(&mut self, frame: &mut Frame) {
        let a = self.areas;
        let dropdowns = [
            (&self.bug_type, a.bug_type),
            (&self.priority, a.priority),
            (&self.severity, a.severity),
            (&self.assignee, a.assignee),
            (&self.verifier, a.verifier),
            (&self.project, a.project),
            (&self.iteration, a.iteration),
            (&self.not_fix_reason, a.not_fix_reason),
        ];
        for (dropdown, field) in dropdowns {
            dropdown.render_expanded_list(frame, field, a.screen);
        }
        self.participants.render_popup(frame, a.participants, a.screen);
        self.cc.render_popup(frame, a.cc, a.screen);
    }

    /// Draw a field's validation message on its bottom border.
    fn render_field_error(&self, frame: &mut Frame, area: Rect, field: FormField) {
        let Some(message) = self.state.field_error(field) else {
            return;
        };
        if area.height < 3 || area.width < 4 {
            return;
        }
        let line = Rect::new(area.x + 2, area.y + area.height - 1, area.width - 4, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {} ", message),
                Style::default().fg(theme().error),
            )),
            line,
        );
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let line = if let Some(error) = &self.date_error {
            Line::from(Span::styled(error.as_str(), Style::default().fg(t.error)))
        } else if self.state.is_loading() {
            Line::from(Span::styled("Saving...", Style::default().fg(t.warning)))
        } else if self.state.is_loading_options() {
            Line::from(Span::styled(
                "Loading options...",
                Style::default().fg(t.muted),
            ))
        } else {
            Line::from(Span::styled(
                "Tab next · Shift-Tab back · Ctrl-S save · Esc cancel",
                Style::default().fg(t.muted),
            ))
        };
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn render_submit_button(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let t = theme();
        let style = if focused {
            Style::default()
                .fg(t.selection_fg)
                .bg(t.success)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.success)
        };
        let text = match (self.state.is_loading(), self.state.mode()) {
            (true, _) => " Saving... ",
            (false, FormMode::Create) => " [Enter] Create Bug ",
            (false, FormMode::Edit) => " [Enter] Save Changes ",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, style)).alignment(Alignment::Center),
            area,
        );
    }
}

/// Calculate a centered rectangle within the given area.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// A full-height panel on the right edge.
fn drawer_rect(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(area.x + area.width - width, area.y, width, area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{seed_bugs, seed_options};
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(view: &mut BugFormView, text: &str) {
        for c in text.chars() {
            view.handle_input(key(KeyCode::Char(c)));
        }
    }

    fn focus_on(view: &mut BugFormView, target: FormFocus) {
        for _ in 0..FormFocus::ORDER.len() {
            if view.focus() == target {
                return;
            }
            view.handle_input(key(KeyCode::Tab));
        }
        panic!("Could not focus {:?}", target);
    }

    fn open_create() -> BugFormView {
        let mut view = BugFormView::default();
        let generation = view.open_create();
        assert!(view.apply_options(generation, Ok(seed_options())));
        view
    }

    #[test]
    fn test_typing_title_updates_state() {
        let mut view = open_create();
        type_str(&mut view, "Crash");
        assert_eq!(view.state().values().title, "Crash");
    }

    #[test]
    fn test_escape_cancels() {
        let mut view = open_create();
        assert_eq!(view.handle_input(key(KeyCode::Esc)), Some(BugFormAction::Cancel));
    }

    #[test]
    fn test_ctrl_s_submits_create() {
        let mut view = open_create();
        type_str(&mut view, "Login button style bug");

        let action = view.handle_input(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        let Some(BugFormAction::Submit(Submission::Create(payload))) = action else {
            panic!("Expected create submission, got {:?}", action);
        };
        assert_eq!(payload.title, "Login button style bug");
        assert_eq!(payload.status, "new");
    }

    #[test]
    fn test_enter_on_submit_with_blank_title_refocuses_title() {
        let mut view = open_create();
        focus_on(&mut view, FormFocus::Submit);
        let action = view.handle_input(key(KeyCode::Enter));
        assert!(matches!(
            action,
            Some(BugFormAction::Rejected(FormError::Validation(_)))
        ));
        assert_eq!(view.focus(), FormFocus::Title);
        assert!(view.state().field_error(FormField::Title).is_some());
    }

    #[test]
    fn test_custom_reason_skipped_until_visible() {
        let mut view = open_create();
        focus_on(&mut view, FormFocus::NotFixReason);
        view.handle_input(key(KeyCode::Tab));
        assert_eq!(view.focus(), FormFocus::Submit);

        focus_on(&mut view, FormFocus::NotFixReason);
        // Rows: None, duplicate, wontfix, notabug, custom
        view.handle_input(key(KeyCode::Enter));
        for _ in 0..4 {
            view.handle_input(key(KeyCode::Down));
        }
        view.handle_input(key(KeyCode::Enter));
        assert!(view.state().custom_reason_visible());

        view.handle_input(key(KeyCode::Tab));
        assert_eq!(view.focus(), FormFocus::CustomReason);
        type_str(&mut view, "Upstream");
        assert_eq!(view.state().values().custom_not_fix_reason, "Upstream");

        view.handle_input(key(KeyCode::BackTab));
        view.handle_input(key(KeyCode::Char('h')));
        assert!(!view.state().custom_reason_visible());
        assert_eq!(view.state().values().custom_not_fix_reason, "");
        assert_eq!(view.custom_reason_input.value(), "");
    }

    #[test]
    fn test_dropdown_selection_reaches_state() {
        let mut view = open_create();
        focus_on(&mut view, FormFocus::Assignee);
        view.handle_input(key(KeyCode::Char('l')));
        assert_eq!(view.state().values().assignee.as_deref(), Some("user1"));
    }

    #[test]
    fn test_escape_in_dropdown_does_not_cancel_form() {
        let mut view = open_create();
        focus_on(&mut view, FormFocus::Priority);
        view.handle_input(key(KeyCode::Enter));
        assert_eq!(view.handle_input(key(KeyCode::Esc)), None);
        assert!(view.is_open());
    }

    #[test]
    fn test_participants_popup() {
        let mut view = open_create();
        focus_on(&mut view, FormFocus::Participants);
        view.handle_input(key(KeyCode::Enter));
        view.handle_input(key(KeyCode::Char(' ')));
        view.handle_input(key(KeyCode::Down));
        view.handle_input(key(KeyCode::Char(' ')));
        view.handle_input(key(KeyCode::Enter));
        assert_eq!(
            view.state().values().participants,
            vec!["user1".to_string(), "user2".to_string()]
        );
    }

    #[test]
    fn test_tags_parsed_on_input() {
        let mut view = open_create();
        focus_on(&mut view, FormFocus::Tags);
        type_str(&mut view, "ui, login");
        assert_eq!(
            view.state().values().tags,
            vec!["ui".to_string(), "login".to_string()]
        );
    }

    #[test]
    fn test_half_filled_dates_submit_without_range() {
        let mut view = open_create();
        type_str(&mut view, "Dated");
        focus_on(&mut view, FormFocus::PlannedStart);
        type_str(&mut view, "2024-05-01");

        let action = view.handle_input(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        let Some(BugFormAction::Submit(Submission::Create(payload))) = action else {
            panic!("Expected create submission");
        };
        assert_eq!(payload.planned_start_date, "");
        assert_eq!(payload.planned_end_date, "");
        assert!(view.date_error.is_none());
    }

    #[test]
    fn test_typed_dates_are_ordered() {
        let mut view = open_create();
        type_str(&mut view, "Dated");
        focus_on(&mut view, FormFocus::PlannedStart);
        type_str(&mut view, "2024-05-01");
        focus_on(&mut view, FormFocus::PlannedEnd);
        type_str(&mut view, "2024-04-28");

        let action = view.handle_input(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        let Some(BugFormAction::Submit(Submission::Create(payload))) = action else {
            panic!("Expected create submission");
        };
        assert_eq!(payload.planned_start_date, "2024-04-28");
        assert_eq!(payload.planned_end_date, "2024-05-01");
    }

    #[test]
    fn test_non_date_text_blocks_submit() {
        let mut view = open_create();
        type_str(&mut view, "Dated");
        focus_on(&mut view, FormFocus::PlannedEnd);
        type_str(&mut view, "soon");

        let action = view.handle_input(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(action, None);
        assert!(view.date_error.is_some());
        assert_eq!(view.focus(), FormFocus::PlannedEnd);
    }

    #[test]
    fn test_reversed_stored_dates_round_trip() {
        let mut bug = seed_bugs().remove(0);
        bug.planned_start_date = "2023-10-18".to_string();
        bug.planned_end_date = "2023-10-16".to_string();

        let mut view = BugFormView::default();
        let generation = view.open_edit(bug.clone());
        view.apply_options(generation, Ok(seed_options()));

        let action = view.handle_input(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(action, Some(BugFormAction::Submit(Submission::Update(bug))));
    }

    #[test]
    fn test_open_edit_prefills_widgets() {
        let bug = seed_bugs().remove(0);
        let mut view = BugFormView::default();
        let generation = view.open_edit(bug.clone());
        view.apply_options(generation, Ok(seed_options()));

        assert_eq!(view.title_input.value(), bug.title);
        assert_eq!(view.description.content(), bug.description);
        assert_eq!(view.assignee.selected_id(), Some(bug.assignee.as_str()));
        assert_eq!(view.start_input.value(), bug.planned_start_date);
        assert_eq!(view.tags_input.value(), format_tags(&bug.tags));
    }

    #[test]
    fn test_edit_submit_unchanged_round_trips() {
        for bug in seed_bugs() {
            let mut view = BugFormView::default();
            let generation = view.open_edit(bug.clone());
            view.apply_options(generation, Ok(seed_options()));

            let action =
                view.handle_input(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
            assert_eq!(action, Some(BugFormAction::Submit(Submission::Update(bug))));
        }
    }

    #[test]
    fn test_input_ignored_while_saving() {
        let mut view = open_create();
        view.set_loading(true);
        assert_eq!(view.handle_input(key(KeyCode::Esc)), None);
        type_str(&mut view, "x");
        assert_eq!(view.state().values().title, "");
    }

    #[test]
    fn test_paste_into_title() {
        let mut view = open_create();
        view.handle_paste("Pasted\ntitle");
        assert_eq!(view.state().values().title, "Pastedtitle");
    }

    #[test]
    fn test_render_create_and_edit() {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let mut view = open_create();
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.render(frame, area);
            })
            .unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("New Bug"));

        let generation = view.open_edit(seed_bugs().remove(1));
        view.apply_options(generation, Ok(seed_options()));
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.render(frame, area);
            })
            .unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Edit BUG-002"));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(area, 40, 20);
        assert_eq!(centered, Rect::new(30, 15, 40, 20));
    }

    #[test]
    fn test_centered_rect_larger_than_area() {
        let area = Rect::new(0, 0, 30, 20);
        let centered = centered_rect(area, 50, 30);
        assert_eq!(centered, area);
    }

    #[test]
    fn test_drawer_rect() {
        let area = Rect::new(0, 0, 120, 40);
        assert_eq!(drawer_rect(area, 72), Rect::new(48, 0, 72, 40));
        assert_eq!(drawer_rect(Rect::new(0, 0, 50, 10), 72), Rect::new(0, 0, 50, 10));
    }
}
