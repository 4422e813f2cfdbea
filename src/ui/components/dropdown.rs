//! Dropdown component for single-choice reference fields.
//!
//! - Displays the selected option's name when collapsed
//! - Expands with Enter to show a "None" entry followed by all options
//! - Supports j/k and arrow key navigation, Enter to pick, Esc to cancel
//! - h/l or Left/Right cycle through options without expanding
//!
//! The selection is kept by id, so a value set before the option list
//! arrives survives the load.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::api::{NotFixReason, ReferenceOption};
use crate::ui::theme::theme;

/// Label of the empty choice.
pub const NONE_LABEL: &str = "None";

/// A single item in a dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem {
    pub id: String,
    pub label: String,
}

impl DropdownItem {
    /// Create a new dropdown item.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl From<&ReferenceOption> for DropdownItem {
    fn from(option: &ReferenceOption) -> Self {
        Self::new(option.id.clone(), option.name.clone())
    }
}

impl From<&NotFixReason> for DropdownItem {
    fn from(reason: &NotFixReason) -> Self {
        Self::new(reason.id.clone(), reason.name.clone())
    }
}

/// Action resulting from dropdown input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownAction {
    /// A choice was made; `None` is the empty choice.
    Select(Option<String>),
    /// The list was closed without choosing.
    Cancel,
}

/// Dropdown component for selecting from a list of options.
#[derive(Debug, Clone)]
pub struct Dropdown {
    items: Vec<DropdownItem>,
    selected: Option<String>,
    /// Highlighted row in the expanded list; row 0 is "None".
    highlighted: usize,
    expanded: bool,
    label: String,
}

impl Dropdown {
    /// Create a new dropdown with a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            highlighted: 0,
            expanded: false,
            label: label.into(),
        }
    }

    /// Replace the available items, keeping the selected id.
    pub fn set_items(&mut self, items: Vec<DropdownItem>) {
        self.items = items;
        self.highlighted = self.selected_row();
    }

    /// Get the available items.
    pub fn items(&self) -> &[DropdownItem] {
        &self.items
    }

    /// Get the selected id.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Set the selected id. Unknown ids are kept until items arrive.
    pub fn set_selected(&mut self, id: Option<String>) {
        self.selected = id.filter(|id| !id.is_empty());
        self.highlighted = self.selected_row();
    }

    /// Get the display label of the selection.
    pub fn selected_label(&self) -> Option<&str> {
        let id = self.selected.as_deref()?;
        Some(
            self.items
                .iter()
                .find(|item| item.id == id)
                .map_or(id, |item| item.label.as_str()),
        )
    }

    /// Check if the dropdown is expanded.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Get the field label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Row of the selection in the expanded list.
    fn selected_row(&self) -> usize {
        self.selected
            .as_deref()
            .and_then(|id| self.items.iter().position(|item| item.id == id))
            .map_or(0, |idx| idx + 1)
    }

    /// Rows in the expanded list, including "None".
    fn row_count(&self) -> usize {
        self.items.len() + 1
    }

    fn select_row(&mut self, row: usize) -> Option<DropdownAction> {
        let id = match row {
            0 => None,
            n => Some(self.items.get(n - 1)?.id.clone()),
        };
        self.selected = id.clone();
        self.highlighted = row;
        Some(DropdownAction::Select(id))
    }

    /// Expand the dropdown.
    pub fn expand(&mut self) {
        self.expanded = true;
        self.highlighted = self.selected_row();
    }

    /// Collapse the dropdown.
    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    /// Handle keyboard input.
    ///
    /// When collapsed, Enter expands and h/l cycle. When expanded, j/k or
    /// arrows navigate, Enter selects, Esc cancels.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<DropdownAction> {
        if self.expanded {
            self.handle_expanded_input(key)
        } else {
            self.handle_collapsed_input(key)
        }
    }

    fn handle_collapsed_input(&mut self, key: KeyEvent) -> Option<DropdownAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) | (KeyCode::Char(' '), KeyModifiers::NONE) => {
                self.expand();
                None
            }
            (KeyCode::Left, KeyModifiers::NONE) | (KeyCode::Char('h'), KeyModifiers::NONE) => {
                let row = self.selected_row();
                if row == 0 {
                    return None;
                }
                self.select_row(row - 1)
            }
            (KeyCode::Right, KeyModifiers::NONE) | (KeyCode::Char('l'), KeyModifiers::NONE) => {
                let row = self.selected_row();
                if row + 1 >= self.row_count() {
                    return None;
                }
                self.select_row(row + 1)
            }
            _ => None,
        }
    }

    fn handle_expanded_input(&mut self, key: KeyEvent) -> Option<DropdownAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                if self.highlighted + 1 < self.row_count() {
                    self.highlighted += 1;
                }
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.highlighted = self.highlighted.saturating_sub(1);
                None
            }
            (KeyCode::Enter, KeyModifiers::NONE) => {
                self.expanded = false;
                self.select_row(self.highlighted)
            }
            (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.expanded = false;
                self.highlighted = self.selected_row();
                Some(DropdownAction::Cancel)
            }
            _ => None,
        }
    }

    /// Render the collapsed field.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let t = theme();

        let (text, text_style) = match self.selected_label() {
            Some(label) => (label.to_string(), Style::default().fg(t.input_fg)),
            None if self.items.is_empty() => (
                "No options available".to_string(),
                Style::default().fg(t.input_placeholder),
            ),
            None => (
                format!("Select {}...", self.label.to_lowercase()),
                Style::default().fg(t.input_placeholder),
            ),
        };
        let indicator = if self.expanded { "▲" } else { "▼" };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.label), t.title_style(focused)))
            .borders(Borders::ALL)
            .border_style(t.border_style(focused));

        let paragraph = Paragraph::new(format!("{} {}", text, indicator))
            .style(text_style)
            .block(block);

        frame.render_widget(paragraph, area);
    }

    /// Render the expanded list as an overlay.
    ///
    /// Call after every other widget so the list draws on top. It opens
    /// below the field when there is room, otherwise above.
    pub fn render_expanded_list(&self, frame: &mut Frame, field_area: Rect, screen_area: Rect) {
        if !self.expanded {
            return;
        }

        let t = theme();
        let max_visible_items = 8;
        let list_height = (self.row_count().min(max_visible_items) + 2) as u16;

        let space_below = (screen_area.y + screen_area.height)
            .saturating_sub(field_area.y + field_area.height);
        let space_above = field_area.y.saturating_sub(screen_area.y);

        let list_area = if space_below >= list_height || space_below >= space_above {
            Rect::new(
                field_area.x,
                field_area.y + field_area.height.saturating_sub(1),
                field_area.width,
                list_height.min(space_below + 1),
            )
        } else {
            Rect::new(
                field_area.x,
                field_area.y.saturating_sub(list_height - 1),
                field_area.width,
                list_height.min(space_above + 1),
            )
        };

        frame.render_widget(Clear, list_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border_focused));

        let selected_row = self.selected_row();
        let rows = std::iter::once(NONE_LABEL).chain(self.items.iter().map(|i| i.label.as_str()));
        let items: Vec<ListItem> = rows
            .enumerate()
            .map(|(row, label)| {
                let style = if row == selected_row {
                    Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(t.fg)
                };
                ListItem::new(label.to_string()).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(t.selection_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.highlighted));

        frame.render_stateful_widget(list, list_area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn priorities() -> Dropdown {
        let mut dropdown = Dropdown::new("Priority");
        dropdown.set_items(vec![
            DropdownItem::new("low", "Low"),
            DropdownItem::new("medium", "Medium"),
            DropdownItem::new("high", "High"),
        ]);
        dropdown
    }

    #[test]
    fn test_new_dropdown() {
        let dropdown = Dropdown::new("Priority");
        assert_eq!(dropdown.label(), "Priority");
        assert!(dropdown.selected_id().is_none());
        assert!(!dropdown.is_expanded());
    }

    #[test]
    fn test_item_from_reference_option() {
        let item = DropdownItem::from(&ReferenceOption::new("user1", "Zhang San"));
        assert_eq!(item, DropdownItem::new("user1", "Zhang San"));
    }

    #[test]
    fn test_selection_survives_late_items() {
        let mut dropdown = Dropdown::new("Assignee");
        dropdown.set_selected(Some("user2".to_string()));
        assert_eq!(dropdown.selected_label(), Some("user2"));

        dropdown.set_items(vec![
            DropdownItem::new("user1", "Zhang San"),
            DropdownItem::new("user2", "Li Si"),
        ]);
        assert_eq!(dropdown.selected_id(), Some("user2"));
        assert_eq!(dropdown.selected_label(), Some("Li Si"));
    }

    #[test]
    fn test_empty_id_is_no_selection() {
        let mut dropdown = priorities();
        dropdown.set_selected(Some(String::new()));
        assert!(dropdown.selected_id().is_none());
    }

    #[test]
    fn test_expand_highlights_selection() {
        let mut dropdown = priorities();
        dropdown.set_selected(Some("medium".to_string()));
        dropdown.handle_input(key(KeyCode::Enter));
        assert!(dropdown.is_expanded());
        assert_eq!(dropdown.highlighted, 2);
    }

    #[test]
    fn test_expanded_navigation_and_select() {
        let mut dropdown = priorities();
        dropdown.expand();
        dropdown.handle_input(key(KeyCode::Char('j')));
        dropdown.handle_input(key(KeyCode::Down));
        dropdown.handle_input(key(KeyCode::Char('k')));
        dropdown.handle_input(key(KeyCode::Down));
        dropdown.handle_input(key(KeyCode::Down));
        dropdown.handle_input(key(KeyCode::Down));
        assert_eq!(dropdown.highlighted, 3);

        let action = dropdown.handle_input(key(KeyCode::Enter));
        assert_eq!(action, Some(DropdownAction::Select(Some("high".to_string()))));
        assert!(!dropdown.is_expanded());
        assert_eq!(dropdown.selected_id(), Some("high"));
    }

    #[test]
    fn test_select_none_row_clears() {
        let mut dropdown = priorities();
        dropdown.set_selected(Some("low".to_string()));
        dropdown.expand();
        dropdown.handle_input(key(KeyCode::Up));

        let action = dropdown.handle_input(key(KeyCode::Enter));
        assert_eq!(action, Some(DropdownAction::Select(None)));
        assert!(dropdown.selected_id().is_none());
    }

    #[test]
    fn test_escape_cancels_without_change() {
        let mut dropdown = priorities();
        dropdown.set_selected(Some("low".to_string()));
        dropdown.expand();
        dropdown.handle_input(key(KeyCode::Down));

        let action = dropdown.handle_input(key(KeyCode::Esc));
        assert_eq!(action, Some(DropdownAction::Cancel));
        assert_eq!(dropdown.selected_id(), Some("low"));
        assert_eq!(dropdown.highlighted, 1);
    }

    #[test]
    fn test_collapsed_cycling() {
        let mut dropdown = priorities();
        assert_eq!(
            dropdown.handle_input(key(KeyCode::Char('l'))),
            Some(DropdownAction::Select(Some("low".to_string())))
        );
        assert_eq!(
            dropdown.handle_input(key(KeyCode::Right)),
            Some(DropdownAction::Select(Some("medium".to_string())))
        );
        assert_eq!(
            dropdown.handle_input(key(KeyCode::Char('h'))),
            Some(DropdownAction::Select(Some("low".to_string())))
        );
        assert_eq!(
            dropdown.handle_input(key(KeyCode::Left)),
            Some(DropdownAction::Select(None))
        );
        assert_eq!(dropdown.handle_input(key(KeyCode::Left)), None);
    }

    #[test]
    fn test_cycling_stops_at_last() {
        let mut dropdown = priorities();
        dropdown.set_selected(Some("high".to_string()));
        assert_eq!(dropdown.handle_input(key(KeyCode::Right)), None);
    }

    #[test]
    fn test_expand_with_no_items_offers_none() {
        let mut dropdown = Dropdown::new("Project");
        dropdown.expand();
        assert!(dropdown.is_expanded());
        let action = dropdown.handle_input(key(KeyCode::Enter));
        assert_eq!(action, Some(DropdownAction::Select(None)));
    }
}
