//! Markdown editor adapter.
//!
//! The form only needs a string in and a string out. Any editor widget that
//! implements [`MarkdownEditor`] can back the description field.

/// A controlled markdown editing surface.
pub trait MarkdownEditor {
    /// Get the current markdown.
    fn markdown(&self) -> String;

    /// Replace the content with the given markdown.
    fn set_markdown(&mut self, markdown: &str);
}

/// Load `value` into the editor unless it already shows it.
///
/// Returns `true` if the editor content was replaced.
pub fn sync_editor<E: MarkdownEditor + ?Sized>(editor: &mut E, value: &str) -> bool {
    if editor.markdown() == value {
        return false;
    }
    editor.set_markdown(value);
    true
}
