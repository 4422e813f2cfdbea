//! Multi-line markdown editor component.
//!
//! Backs the description field. Supports:
//! - Multi-line editing with a character-based cursor
//! - Cursor movement (arrows, home/end)
//! - Scrolling for content longer than the visible area
//! - Light markdown highlighting (headings, list items, code fences)

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::form::MarkdownEditor;
use crate::ui::theme::theme;

/// A multi-line text editor component.
#[derive(Debug, Clone)]
pub struct TextEditor {
    /// Lines of text content.
    lines: Vec<String>,
    /// Current line (0-indexed).
    cursor_line: usize,
    /// Current column within the line, in characters.
    cursor_col: usize,
    /// Scroll offset (first visible line).
    scroll: usize,
    /// Shown when the content is empty.
    placeholder: String,
}

impl TextEditor {
    /// Create a new text editor with the given content.
    pub fn new(content: &str) -> Self {
        let mut editor = Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll: 0,
            placeholder: String::new(),
        };
        editor.set_markdown(content);
        editor
    }

    /// Create an empty text editor.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Set the placeholder text.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Get the current content as a string.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Check if the editor holds no text.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Get the current cursor line.
    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    /// Get the current cursor column.
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    /// Get the number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines[line].chars().count()
    }

    fn byte_index(line: &str, char_index: usize) -> usize {
        line.char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn cursor_byte(&self) -> usize {
        Self::byte_index(&self.lines[self.cursor_line], self.cursor_col)
    }

    fn clamp_cursor_col(&mut self) {
        self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_line));
    }

    fn ensure_cursor_visible(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll {
            self.scroll = self.cursor_line;
        }
        if self.cursor_line >= self.scroll + visible_height {
            self.scroll = self.cursor_line + 1 - visible_height;
        }
    }

    /// Insert text at the cursor, splitting on newlines.
    pub fn insert_str(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.insert_newline();
            }
            for c in part.chars().filter(|c| *c != '\r') {
                self.insert_char(c);
            }
        }
        true
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the content was modified.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                true
            }
            (KeyCode::Enter, KeyModifiers::NONE) => {
                self.insert_newline();
                true
            }
            (KeyCode::Backspace, _) => self.delete_backward(),
            (KeyCode::Delete, _) => self.delete_forward(),
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.move_left();
                false
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                self.move_right();
                false
            }
            (KeyCode::Up, KeyModifiers::NONE) => {
                if self.cursor_line > 0 {
                    self.cursor_line -= 1;
                    self.clamp_cursor_col();
                }
                false
            }
            (KeyCode::Down, KeyModifiers::NONE) => {
                if self.cursor_line + 1 < self.lines.len() {
                    self.cursor_line += 1;
                    self.clamp_cursor_col();
                }
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor_col = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor_col = self.line_len(self.cursor_line);
                false
            }
            // Delete from cursor to end of line, or join the next line
            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                if self.cursor_col < self.line_len(self.cursor_line) {
                    let at = self.cursor_byte();
                    self.lines[self.cursor_line].truncate(at);
                    true
                } else {
                    self.join_next_line()
                }
            }
            _ => false,
        }
    }

    fn insert_char(&mut self, c: char) {
        let at = self.cursor_byte();
        self.lines[self.cursor_line].insert(at, c);
        self.cursor_col += 1;
    }

    fn insert_newline(&mut self) {
        let at = self.cursor_byte();
        let rest = self.lines[self.cursor_line].split_off(at);
        self.lines.insert(self.cursor_line + 1, rest);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    fn join_next_line(&mut self) -> bool {
        if self.cursor_line + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(self.cursor_line + 1);
        self.lines[self.cursor_line].push_str(&next);
        true
    }

    fn delete_backward(&mut self) -> bool {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let at = self.cursor_byte();
            self.lines[self.cursor_line].remove(at);
            true
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.lines[self.cursor_line].push_str(&current);
            true
        } else {
            false
        }
    }

    fn delete_forward(&mut self) -> bool {
        if self.cursor_col < self.line_len(self.cursor_line) {
            let at = self.cursor_byte();
            self.lines[self.cursor_line].remove(at);
            true
        } else {
            self.join_next_line()
        }
    }

    fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
        }
    }

    fn move_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    /// Style a markdown source line.
    fn highlight(line: &str, in_code: bool) -> Line<'_> {
        let t = theme();
        let trimmed = line.trim_start();
        if in_code || trimmed.starts_with("```") {
            Line::from(Span::styled(line, Style::default().fg(t.muted)))
        } else if trimmed.starts_with('#') {
            Line::from(Span::styled(
                line,
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ))
        } else if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
            Line::from(Span::styled(line, Style::default().fg(t.fg)))
        } else {
            Line::from(line)
        }
    }

    /// Render the editor inside a labelled border.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, title: &str) {
        let t = theme();
        let visible_height = area.height.saturating_sub(2) as usize;
        self.ensure_cursor_visible(visible_height);

        let block = Block::default()
            .title(Span::styled(format!(" {} ", title), t.title_style(focused)))
            .borders(Borders::ALL)
            .border_style(t.border_style(focused));

        let paragraph = if self.is_empty() && !self.placeholder.is_empty() {
            Paragraph::new(Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(t.input_placeholder),
            ))
        } else {
            let mut in_code = false;
            let mut rendered = Vec::with_capacity(self.lines.len());
            for line in &self.lines {
                let fence = line.trim_start().starts_with("```");
                rendered.push(Self::highlight(line, in_code));
                if fence {
                    in_code = !in_code;
                }
            }
            let visible: Vec<Line> = rendered
                .into_iter()
                .skip(self.scroll)
                .take(visible_height)
                .collect();
            Paragraph::new(visible)
        };

        frame.render_widget(paragraph.block(block), area);

        if focused {
            let line = &self.lines[self.cursor_line];
            let before = &line[..Self::byte_index(line, self.cursor_col)];
            let cursor_x = area.x + 1 + Line::from(before).width() as u16;
            let cursor_y = area.y + 1 + (self.cursor_line - self.scroll) as u16;

            if cursor_y < area.y + area.height.saturating_sub(1)
                && cursor_x < area.x + area.width.saturating_sub(1)
            {
                frame.set_cursor_position(Position::new(cursor_x, cursor_y));
            }
        }
    }
}

impl MarkdownEditor for TextEditor {
    fn markdown(&self) -> String {
        self.content()
    }

    fn set_markdown(&mut self, markdown: &str) {
        self.lines = markdown.split('\n').map(String::from).collect();
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.scroll = 0;
    }
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::empty()
    }
}
