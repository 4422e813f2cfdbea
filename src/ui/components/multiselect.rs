//! Multi-select widget for user lists (participants, cc).
//!
//! Collapsed, it shows the chosen names in one line. Expanded, it opens a
//! checkbox popup. The chosen ids keep the order they were picked in, and
//! ids the option list does not know are kept as-is.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::ui::theme::theme;

use super::dropdown::DropdownItem;

/// Action resulting from multi-select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSelectAction {
    /// The chosen ids changed.
    Changed(Vec<String>),
    /// The popup closed.
    Close,
}

/// A multi-select widget that allows choosing several items from a list.
#[derive(Debug, Clone)]
pub struct MultiSelect {
    items: Vec<DropdownItem>,
    selected: Vec<String>,
    cursor: usize,
    expanded: bool,
    title: String,
    list_state: ListState,
}

impl MultiSelect {
    /// Create a new multi-select widget.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            selected: Vec::new(),
            cursor: 0,
            expanded: false,
            title: title.into(),
            list_state: ListState::default(),
        }
    }

    /// Set the items to display.
    pub fn set_items(&mut self, items: Vec<DropdownItem>) {
        self.items = items;
        self.cursor = 0;
    }

    /// Set the chosen ids.
    pub fn set_selected(&mut self, selected: Vec<String>) {
        self.selected = selected;
    }

    /// Get the chosen ids in pick order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Check if an item is chosen.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Check if the popup is open.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Get the widget title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Display names of the chosen ids.
    pub fn selected_labels(&self) -> Vec<&str> {
        self.selected
            .iter()
            .map(|id| {
                self.items
                    .iter()
                    .find(|item| &item.id == id)
                    .map_or(id.as_str(), |item| item.label.as_str())
            })
            .collect()
    }

    /// Toggle the item under the cursor.
    pub fn toggle_current(&mut self) -> bool {
        let Some(item) = self.items.get(self.cursor) else {
            return false;
        };
        if let Some(pos) = self.selected.iter().position(|id| *id == item.id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(item.id.clone());
        }
        true
    }

    /// Open the popup.
    pub fn expand(&mut self) {
        self.expanded = true;
        self.cursor = 0;
    }

    /// Close the popup.
    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<MultiSelectAction> {
        if !self.expanded {
            return match (key.code, key.modifiers) {
                (KeyCode::Enter, KeyModifiers::NONE) | (KeyCode::Char(' '), KeyModifiers::NONE) => {
                    self.expand();
                    None
                }
                // Clear all
                (KeyCode::Backspace, _) | (KeyCode::Delete, _) if !self.selected.is_empty() => {
                    self.selected.clear();
                    Some(MultiSelectAction::Changed(Vec::new()))
                }
                _ => None,
            };
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                if self.cursor + 1 < self.items.len() {
                    self.cursor += 1;
                }
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => {
                self.cursor = 0;
                None
            }
            (KeyCode::End, _) | (KeyCode::Char('G'), _) => {
                self.cursor = self.items.len().saturating_sub(1);
                None
            }
            (KeyCode::Char(' '), KeyModifiers::NONE) => self
                .toggle_current()
                .then(|| MultiSelectAction::Changed(self.selected.clone())),
            (KeyCode::Enter, _) | (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.expanded = false;
                Some(MultiSelectAction::Close)
            }
            _ => None,
        }
    }

    /// Render the collapsed field.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let t = theme();
        let labels = self.selected_labels();

        let title = if labels.is_empty() {
            format!(" {} ", self.title)
        } else {
            format!(" {} ({}) ", self.title, labels.len())
        };

        let content = if labels.is_empty() {
            Span::styled(
                format!("Select {}...", self.title.to_lowercase()),
                Style::default().fg(t.input_placeholder),
            )
        } else {
            Span::styled(labels.join(", "), Style::default().fg(t.input_fg))
        };

        let block = Block::default()
            .title(Span::styled(title, t.title_style(focused)))
            .borders(Borders::ALL)
            .border_style(t.border_style(focused));

        frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);
    }

    /// Render the checkbox popup as an overlay below or above the field.
    pub fn render_popup(&mut self, frame: &mut Frame, field_area: Rect, screen_area: Rect) {
        if !self.expanded {
            return;
        }

        let t = theme();
        let height = (self.items.len().clamp(1, 8) + 2) as u16;
        let below = (screen_area.y + screen_area.height)
            .saturating_sub(field_area.y + field_area.height);
        let y = if below >= height {
            field_area.y + field_area.height
        } else {
            field_area.y.saturating_sub(height)
        };
        let area = Rect::new(field_area.x, y, field_area.width, height).intersection(screen_area);

        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(Span::styled(
                " Space toggle · Enter done ",
                Style::default().fg(t.muted),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border_focused));

        if self.items.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "No options available",
                Style::default().fg(t.muted),
            ))
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let chosen = self.is_selected(&item.id);
                let (checkbox, style) = if chosen {
                    ("[x]", Style::default().fg(t.success))
                } else {
                    ("[ ]", Style::default().fg(t.fg))
                };
                ListItem::new(Line::from(vec![
                    Span::styled(checkbox, style),
                    Span::raw(" "),
                    Span::styled(item.label.clone(), Style::default().fg(t.fg)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(t.selection_style().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        self.list_state.select(Some(self.cursor));
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

impl Default for MultiSelect {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn users() -> MultiSelect {
        let mut select = MultiSelect::new("Participants");
        select.set_items(vec![
            DropdownItem::new("user1", "Zhang San"),
            DropdownItem::new("user2", "Li Si"),
            DropdownItem::new("user3", "Wang Wu"),
        ]);
        select
    }

    #[test]
    fn test_new_multiselect() {
        let select = MultiSelect::new("CC");
        assert_eq!(select.title(), "CC");
        assert!(select.selected().is_empty());
        assert!(!select.is_expanded());
    }

    #[test]
    fn test_enter_opens_popup() {
        let mut select = users();
        assert_eq!(select.handle_input(key(KeyCode::Enter)), None);
        assert!(select.is_expanded());
    }

    #[test]
    fn test_toggle_keeps_pick_order() {
        let mut select = users();
        select.expand();
        select.handle_input(key(KeyCode::Down));
        select.handle_input(key(KeyCode::Down));
        select.handle_input(key(KeyCode::Char(' ')));
        select.handle_input(key(KeyCode::Up));
        select.handle_input(key(KeyCode::Up));

        let action = select.handle_input(key(KeyCode::Char(' ')));
        assert_eq!(
            action,
            Some(MultiSelectAction::Changed(vec![
                "user3".to_string(),
                "user1".to_string()
            ]))
        );
    }

    #[test]
    fn test_toggle_off() {
        let mut select = users();
        select.set_selected(vec!["user1".to_string(), "user2".to_string()]);
        select.expand();

        let action = select.handle_input(key(KeyCode::Char(' ')));
        assert_eq!(
            action,
            Some(MultiSelectAction::Changed(vec!["user2".to_string()]))
        );
    }

    #[test]
    fn test_close_popup() {
        let mut select = users();
        select.expand();
        assert_eq!(
            select.handle_input(key(KeyCode::Esc)),
            Some(MultiSelectAction::Close)
        );
        assert!(!select.is_expanded());
    }

    #[test]
    fn test_unknown_ids_kept_and_shown_raw() {
        let mut select = users();
        select.set_selected(vec!["ghost".to_string(), "user2".to_string()]);
        assert_eq!(select.selected_labels(), vec!["ghost", "Li Si"]);
    }

    #[test]
    fn test_backspace_clears_when_collapsed() {
        let mut select = users();
        select.set_selected(vec!["user1".to_string()]);
        assert_eq!(
            select.handle_input(key(KeyCode::Backspace)),
            Some(MultiSelectAction::Changed(Vec::new()))
        );
        assert_eq!(select.handle_input(key(KeyCode::Backspace)), None);
    }

    #[test]
    fn test_toggle_on_empty_list() {
        let mut select = MultiSelect::new("CC");
        select.expand();
        assert_eq!(select.handle_input(key(KeyCode::Char(' '))), None);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut select = users();
        select.expand();
        select.handle_input(key(KeyCode::End));
        assert_eq!(select.cursor, 2);
        select.handle_input(key(KeyCode::Down));
        assert_eq!(select.cursor, 2);
        select.handle_input(key(KeyCode::Char('g')));
        assert_eq!(select.cursor, 0);
    }
}
