//! The bug form: values, state reducer, field rules and submission payloads.
//!
//! Nothing in here touches the terminal. The view in `ui::views::bug_form`
//! drives a [`FormState`] and hands the resulting [`Submission`] to the app.

mod editor;
mod options;
pub mod policy;
mod state;
mod submit;
mod values;

pub use editor::{sync_editor, MarkdownEditor};
pub use options::{load_options, Generation, OptionLoader};
pub use state::{FieldError, FormError, FormField, FormMsg, FormState, DEFAULT_CREATOR};
pub use submit::{build_create, build_update, Submission};
pub use values::{format_tags, parse_date, parse_tags, BugFormValues, DateRange, FormMode, DATE_FORMAT};
