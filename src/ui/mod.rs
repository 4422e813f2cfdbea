//! User interface components and views.
//!
//! This module contains all TUI rendering logic: the bug list, the bug form,
//! and the reusable widgets they are built from.

mod components;
pub mod theme;
mod views;

pub use components::{
    render_hints, Dropdown, DropdownAction, DropdownItem, LoadingIndicator, MultiSelect,
    MultiSelectAction, Notification, NotificationManager, NotificationType, SpinnerStyle,
    TextEditor, TextInput, FORM_HINTS, LIST_HINTS, NONE_LABEL,
};
pub use theme::{init_theme, theme, Theme};
pub use views::{
    BugFormAction, BugFormView, Column, ColumnSet, FormFocus, ListAction, ListView,
};
