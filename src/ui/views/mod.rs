//! Application views (screens).

mod bug_form;
mod list;

pub use bug_form::{BugFormAction, BugFormView, FormFocus};
pub use list::{Column, ColumnSet, ListAction, ListView};
