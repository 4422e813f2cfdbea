//! Theme and styling configuration.
//!
//! Components read colors through [`theme()`] so the whole UI switches when
//! the preference changes.

use std::sync::{OnceLock, RwLock};

use ratatui::style::{Color, Modifier, Style};
use tracing::debug;

use crate::config::ThemePreference;

/// Color theme for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Secondary text.
    pub muted: Color,
    /// Titles, keys and other highlights.
    pub accent: Color,
    /// Unfocused borders.
    pub border: Color,
    /// Border of the focused widget.
    pub border_focused: Color,
    /// Text typed into inputs.
    pub input_fg: Color,
    /// Placeholder text in empty inputs.
    pub input_placeholder: Color,
    /// Foreground of the selected row or option.
    pub selection_fg: Color,
    /// Background of the selected row or option.
    pub selection_bg: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub info: Color,
}

impl Theme {
    /// Palette for dark terminals.
    pub const fn dark() -> Self {
        Self {
            fg: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Yellow,
            input_fg: Color::White,
            input_placeholder: Color::DarkGray,
            selection_fg: Color::Black,
            selection_bg: Color::Cyan,
            error: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            info: Color::Blue,
        }
    }

    /// Palette for light terminals.
    pub const fn light() -> Self {
        Self {
            fg: Color::Black,
            muted: Color::Gray,
            accent: Color::Blue,
            border: Color::Gray,
            border_focused: Color::Magenta,
            input_fg: Color::Black,
            input_placeholder: Color::Gray,
            selection_fg: Color::White,
            selection_bg: Color::Blue,
            error: Color::Red,
            success: Color::Green,
            warning: Color::Rgb(176, 112, 0),
            info: Color::Blue,
        }
    }

    /// Build the palette for a preference.
    pub fn for_preference(preference: ThemePreference) -> Self {
        match preference.resolve() {
            ThemePreference::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a border, depending on focus.
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Style for a widget title, depending on focus.
    pub fn title_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.fg)
        }
    }

    /// Style for a selected row.
    pub fn selection_style(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

static THEME: OnceLock<RwLock<Theme>> = OnceLock::new();

fn cell() -> &'static RwLock<Theme> {
    THEME.get_or_init(|| RwLock::new(Theme::default()))
}

/// Get the active theme.
pub fn theme() -> Theme {
    match cell().read() {
        Ok(theme) => *theme,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Activate the palette for a preference.
pub fn init_theme(preference: ThemePreference) {
    let next = Theme::for_preference(preference);
    debug!(preference = preference.display_name(), "Applying theme");
    match cell().write() {
        Ok(mut theme) => *theme = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
}
