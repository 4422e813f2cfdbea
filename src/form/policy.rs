//! The custom not-fix reason rule.
//!
//! The free-text reason is only shown, and only kept, while the selected
//! not-fix reason is flagged as custom in the loaded list.

use crate::api::NotFixReason;

/// Check whether the custom reason field should be visible.
pub fn custom_reason_visible(selected: Option<&str>, reasons: &[NotFixReason]) -> bool {
    selected
        .and_then(|id| reasons.iter().find(|r| r.id == id))
        .is_some_and(|r| r.is_custom)
}

/// Apply the rule to a custom reason value.
///
/// Clears `custom_reason` when the selection has no custom match. Returns
/// `true` if the value changed.
pub fn enforce_custom_reason(
    selected: Option<&str>,
    reasons: &[NotFixReason],
    custom_reason: &mut String,
) -> bool {
    if custom_reason_visible(selected, reasons) || custom_reason.is_empty() {
        return false;
    }
    custom_reason.clear();
    true
}
