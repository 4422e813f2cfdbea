//! Editable field values of the bug form.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::api::Bug;

/// Pattern used for every date the form emits.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether the form creates a new bug or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// A new record; the repository assigns its identity.
    #[default]
    Create,
    /// An existing record, replaced in place on submit.
    Edit,
}

impl FormMode {
    /// Get the display name for this mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit => "edit",
        }
    }
}

/// A planned date range. Both endpoints are always set.
///
/// Ranges picked in the form are ordered. Ranges read from a record keep
/// the order they were stored in, so an unchanged edit saves them as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, swapping the endpoints if they are out of order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Build a range from two stored date strings, keeping their order.
    ///
    /// Returns `None` unless both strings parse.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Format both endpoints with [`DATE_FORMAT`].
    pub fn format(&self) -> (String, String) {
        (
            self.start.format(DATE_FORMAT).to_string(),
            self.end.format(DATE_FORMAT).to_string(),
        )
    }
}

/// Parse a stored date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// RFC 3339 timestamps; the time part is dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

/// The form's field values.
///
/// Selector fields hold `None` when unset; list fields keep selection order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BugFormValues {
    pub title: String,
    pub description: String,
    pub bug_type: Option<String>,
    pub assignee: Option<String>,
    pub verifier: Option<String>,
    pub priority: Option<String>,
    pub project: Option<String>,
    pub iteration: Option<String>,
    pub severity: Option<String>,
    pub participants: Vec<String>,
    pub cc: Vec<String>,
    pub tags: Vec<String>,
    pub planned: Option<DateRange>,
    pub not_fix_reason: Option<String>,
    pub custom_not_fix_reason: String,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl BugFormValues {
    /// Copy the editable fields of a stored bug.
    pub fn from_bug(bug: &Bug) -> Self {
        Self {
            title: bug.title.clone(),
            description: bug.description.clone(),
            bug_type: non_empty(&bug.bug_type),
            assignee: non_empty(&bug.assignee),
            verifier: non_empty(&bug.verifier),
            priority: non_empty(&bug.priority),
            project: non_empty(&bug.project),
            iteration: non_empty(&bug.iteration),
            severity: non_empty(&bug.severity),
            participants: bug.participants.clone(),
            cc: bug.cc.clone(),
            tags: bug.tags.clone(),
            planned: DateRange::parse(&bug.planned_start_date, &bug.planned_end_date),
            not_fix_reason: non_empty(&bug.not_fix_reason),
            custom_not_fix_reason: bug.custom_not_fix_reason.clone(),
        }
    }
}

/// Split comma separated tag text into tags.
///
/// Tokens are trimmed; blanks and duplicates are dropped, first occurrence wins.
pub fn parse_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == token) {
            tags.push(token.to_string());
        }
    }
    tags
}

/// Join tags for display in a text input.
pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::seed_bugs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2023-10-16"), Some(date(2023, 10, 16)));
        assert_eq!(parse_date(" 2023-10-16 "), Some(date(2023, 10, 16)));
        assert_eq!(parse_date("2023-10-16 08:30:00"), Some(date(2023, 10, 16)));
        assert_eq!(parse_date("2023-10-16T08:30:00"), Some(date(2023, 10, 16)));
        assert_eq!(
            parse_date("2023-10-16T08:30:00+02:00"),
            Some(date(2023, 10, 16))
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("16/10/2023"), None);
        assert_eq!(parse_date("2023-02-30"), None);
    }

    #[test]
    fn test_date_range_orders_endpoints() {
        let range = DateRange::new(date(2023, 10, 20), date(2023, 10, 16));
        assert_eq!(range.start(), date(2023, 10, 16));
        assert_eq!(range.end(), date(2023, 10, 20));
    }

    #[test]
    fn test_date_range_parse_keeps_stored_order() {
        let range = DateRange::parse("2023-10-18", "2023-10-16").unwrap();
        assert_eq!(range.start(), date(2023, 10, 18));
        assert_eq!(range.end(), date(2023, 10, 16));
    }

    #[test]
    fn test_date_range_parse_requires_both() {
        assert!(DateRange::parse("2023-10-16", "2023-10-18").is_some());
        assert!(DateRange::parse("2023-10-16", "").is_none());
        assert!(DateRange::parse("", "2023-10-18").is_none());
    }

    #[test]
    fn test_date_range_format() {
        let range = DateRange::new(date(2024, 1, 2), date(2024, 1, 9));
        assert_eq!(
            range.format(),
            ("2024-01-02".to_string(), "2024-01-09".to_string())
        );
    }

    #[test]
    fn test_from_bug_copies_fields() {
        let bug = &seed_bugs()[0];
        let values = BugFormValues::from_bug(bug);

        assert_eq!(values.title, bug.title);
        assert_eq!(values.assignee.as_deref(), Some("user1"));
        assert_eq!(values.participants, bug.participants);
        assert_eq!(values.not_fix_reason, None);
        let range = values.planned.unwrap();
        assert_eq!(range.start(), date(2023, 10, 16));
        assert_eq!(range.end(), date(2023, 10, 18));
    }

    #[test]
    fn test_from_bug_empty_fields_are_unset() {
        let bug = Bug {
            id: "BUG-010".to_string(),
            title: "Empty".to_string(),
            ..Default::default()
        };
        let values = BugFormValues::from_bug(&bug);
        assert_eq!(values.bug_type, None);
        assert_eq!(values.project, None);
        assert!(values.planned.is_none());
        assert!(values.tags.is_empty());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" UI, frontend,,UI , api "),
            vec!["UI".to_string(), "frontend".to_string(), "api".to_string()]
        );
        assert!(parse_tags("  ,  ").is_empty());
    }

    #[test]
    fn test_format_tags() {
        let tags = vec!["UI".to_string(), "frontend".to_string()];
        assert_eq!(format_tags(&tags), "UI, frontend");
        assert_eq!(parse_tags(&format_tags(&tags)), tags);
    }

    #[test]
    fn test_form_mode_display_name() {
        assert_eq!(FormMode::Create.display_name(), "create");
        assert_eq!(FormMode::Edit.display_name(), "edit");
        assert_eq!(FormMode::default(), FormMode::Create);
    }
}
