//! Key hint bar shown at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::theme;

/// Hints for the bug list.
pub const LIST_HINTS: &str =
    "[j/k] move  [Enter] edit  [n] new  [r] refresh  [c] columns  [t] theme  [q] quit";

/// Hints while the bug form is open.
pub const FORM_HINTS: &str =
    "[Tab] next  [S-Tab] back  [Enter] pick  [Ctrl-S] save  [Esc] cancel";

/// Render a line of key hints.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &str) {
    let paragraph = Paragraph::new(Line::from(parse_hints_to_spans(hints)));
    frame.render_widget(paragraph, area);
}

/// Parse hint text into styled spans.
///
/// Highlights the key portion (in brackets) differently from the description.
fn parse_hints_to_spans(hints: &str) -> Vec<Span<'static>> {
    let t = theme();
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for c in hints.chars() {
        match c {
            '[' => {
                // Flush any pending text
                if !current.is_empty() {
                    spans.push(Span::styled(
                        current.clone(),
                        Style::default().fg(t.muted),
                    ));
                    current.clear();
                }
                in_bracket = true;
                current.push(c);
            }
            ']' => {
                current.push(c);
                if in_bracket {
                    // This is a key, style it differently
                    spans.push(Span::styled(
                        current.clone(),
                        Style::default().fg(t.accent),
                    ));
                    current.clear();
                    in_bracket = false;
                }
            }
            _ => {
                current.push(c);
            }
        }
    }

    // Flush any remaining text
    if !current.is_empty() {
        spans.push(Span::styled(current, Style::default().fg(t.muted)));
    }

    spans
}
