//! Loading indicator component.
//!
//! An animated spinner shown while repository calls are in flight. Several
//! calls can overlap (a refresh and a save), so the indicator counts them and
//! shows the message of the most recent one.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::theme;

/// Spinner animation frames.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// ASCII spinner for terminals without braille glyphs.
const SIMPLE_SPINNER_FRAMES: &[&str] = &["|", "/", "-", "\\"];

/// The type of spinner to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerStyle {
    #[default]
    Braille,
    Simple,
}

impl SpinnerStyle {
    /// Get the frames for this spinner style.
    pub fn frames(&self) -> &'static [&'static str] {
        match self {
            SpinnerStyle::Braille => SPINNER_FRAMES,
            SpinnerStyle::Simple => SIMPLE_SPINNER_FRAMES,
        }
    }
}

/// A loading indicator with an animated spinner.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    /// Messages of in-flight operations, oldest first.
    messages: Vec<String>,
    spinner_state: usize,
    spinner_style: SpinnerStyle,
}

impl LoadingIndicator {
    /// Create a new, idle loading indicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spinner style.
    pub fn with_style(mut self, style: SpinnerStyle) -> Self {
        self.spinner_style = style;
        self
    }

    /// Register an operation that started.
    pub fn start(&mut self, message: impl Into<String>) {
        if self.messages.is_empty() {
            self.spinner_state = 0;
        }
        self.messages.push(message.into());
    }

    /// Register that the operation with this message finished.
    pub fn finish(&mut self, message: &str) {
        if let Some(pos) = self.messages.iter().rposition(|m| m == message) {
            self.messages.remove(pos);
        }
    }

    /// Check if any operation is in flight.
    pub fn is_active(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Get the message of the latest operation.
    pub fn message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    /// Advance the spinner animation. Call on each tick.
    pub fn tick(&mut self) {
        if self.is_active() {
            let frames = self.spinner_style.frames();
            self.spinner_state = (self.spinner_state + 1) % frames.len();
        }
    }

    /// Get the current spinner frame.
    pub fn spinner_frame(&self) -> &'static str {
        let frames = self.spinner_style.frames();
        frames[self.spinner_state % frames.len()]
    }

    /// Get the formatted loading text, empty when idle.
    pub fn text(&self) -> String {
        match self.message() {
            Some(message) => format!("{} {}", self.spinner_frame(), message),
            None => String::new(),
        }
    }

    /// Render the indicator right-aligned in the given area.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.is_active() {
            return;
        }
        let paragraph = Paragraph::new(self.text())
            .style(Style::default().fg(theme().accent))
            .alignment(Alignment::Right);
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle() {
        let loading = LoadingIndicator::new();
        assert!(!loading.is_active());
        assert_eq!(loading.text(), "");
    }

    #[test]
    fn test_start_and_finish() {
        let mut loading = LoadingIndicator::new();
        loading.start("Loading bugs...");
        assert!(loading.is_active());
        assert_eq!(loading.message(), Some("Loading bugs..."));

        loading.finish("Loading bugs...");
        assert!(!loading.is_active());
    }

    #[test]
    fn test_overlapping_operations() {
        let mut loading = LoadingIndicator::new();
        loading.start("Loading bugs...");
        loading.start("Saving...");
        assert_eq!(loading.message(), Some("Saving..."));

        loading.finish("Saving...");
        assert_eq!(loading.message(), Some("Loading bugs..."));
    }

    #[test]
    fn test_finish_unknown_message_is_noop() {
        let mut loading = LoadingIndicator::new();
        loading.start("Saving...");
        loading.finish("Other");
        assert!(loading.is_active());
    }

    #[test]
    fn test_tick_wraps() {
        let mut loading = LoadingIndicator::new().with_style(SpinnerStyle::Simple);
        loading.start("Working");
        for _ in 0..4 {
            loading.tick();
        }
        assert_eq!(loading.spinner_frame(), "|");
        loading.tick();
        assert_eq!(loading.spinner_frame(), "/");
        assert_eq!(loading.text(), "/ Working");
    }

    #[test]
    fn test_tick_idle_does_not_advance() {
        let mut loading = LoadingIndicator::new();
        loading.tick();
        assert_eq!(loading.spinner_frame(), SPINNER_FRAMES[0]);
    }
}
