//! Reusable UI components.

mod dropdown;
mod help_bar;
mod input;
mod loading;
mod multiselect;
mod notification;
mod text_editor;

pub use dropdown::{Dropdown, DropdownAction, DropdownItem, NONE_LABEL};
pub use help_bar::{render_hints, FORM_HINTS, LIST_HINTS};
pub use input::TextInput;
pub use loading::{LoadingIndicator, SpinnerStyle};
pub use multiselect::{MultiSelect, MultiSelectAction};
pub use notification::{Notification, NotificationManager, NotificationType};
pub use text_editor::TextEditor;
