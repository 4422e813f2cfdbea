//! Terminal events for the application.

mod handler;

use crossterm::event::KeyEvent;

pub use handler::EventHandler;

/// An event delivered to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// Pasted text.
    Paste(String),
    /// The terminal was resized.
    Resize(u16, u16),
    /// No input within the tick rate; advances spinners and toasts.
    Tick,
}
