//! Conversion of form values into repository payloads.

use crate::api::{Bug, NewBug, types::STATUS_NEW};

use super::values::BugFormValues;

/// A validated form submission, ready to hand to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Create a new bug.
    Create(NewBug),
    /// Replace an existing bug.
    Update(Bug),
}

impl Submission {
    /// Get the submitted title.
    pub fn title(&self) -> &str {
        match self {
            Submission::Create(new_bug) => &new_bug.title,
            Submission::Update(bug) => &bug.title,
        }
    }
}

/// Editable fields in payload shape.
struct EditableFields {
    title: String,
    description: String,
    bug_type: String,
    assignee: String,
    verifier: String,
    priority: String,
    project: String,
    iteration: String,
    severity: String,
    participants: Vec<String>,
    cc: Vec<String>,
    tags: Vec<String>,
    planned_start_date: String,
    planned_end_date: String,
    not_fix_reason: String,
    custom_not_fix_reason: String,
}

impl EditableFields {
    fn from_values(values: &BugFormValues) -> Self {
        let (planned_start_date, planned_end_date) = values
            .planned
            .map(|range| range.format())
            .unwrap_or_default();

        Self {
            title: values.title.clone(),
            description: values.description.clone(),
            bug_type: values.bug_type.clone().unwrap_or_default(),
            assignee: values.assignee.clone().unwrap_or_default(),
            verifier: values.verifier.clone().unwrap_or_default(),
            priority: values.priority.clone().unwrap_or_default(),
            project: values.project.clone().unwrap_or_default(),
            iteration: values.iteration.clone().unwrap_or_default(),
            severity: values.severity.clone().unwrap_or_default(),
            participants: values.participants.clone(),
            cc: values.cc.clone(),
            tags: values.tags.clone(),
            planned_start_date,
            planned_end_date,
            not_fix_reason: values.not_fix_reason.clone().unwrap_or_default(),
            custom_not_fix_reason: values.custom_not_fix_reason.clone(),
        }
    }
}

/// Build the payload for a new bug.
///
/// Status, creator and completion date are fixed at creation time.
pub fn build_create(values: &BugFormValues, creator: &str) -> NewBug {
    let f = EditableFields::from_values(values);
    NewBug {
        title: f.title,
        description: f.description,
        status: STATUS_NEW.to_string(),
        assignee: f.assignee,
        creator: creator.to_string(),
        bug_type: f.bug_type,
        priority: f.priority,
        iteration: f.iteration,
        planned_start_date: f.planned_start_date,
        planned_end_date: f.planned_end_date,
        completion_date: String::new(),
        verifier: f.verifier,
        project: f.project,
        severity: f.severity,
        participants: f.participants,
        cc: f.cc,
        tags: f.tags,
        not_fix_reason: f.not_fix_reason,
        custom_not_fix_reason: f.custom_not_fix_reason,
    }
}

/// Build the updated record for an existing bug.
///
/// Fields the form does not edit (id, creation date, status, creator,
/// completion date) come from `original`.
pub fn build_update(values: &BugFormValues, original: &Bug) -> Bug {
    let f = EditableFields::from_values(values);
    Bug {
        title: f.title,
        description: f.description,
        bug_type: f.bug_type,
        assignee: f.assignee,
        verifier: f.verifier,
        priority: f.priority,
        project: f.project,
        iteration: f.iteration,
        severity: f.severity,
        participants: f.participants,
        cc: f.cc,
        tags: f.tags,
        planned_start_date: f.planned_start_date,
        planned_end_date: f.planned_end_date,
        not_fix_reason: f.not_fix_reason,
        custom_not_fix_reason: f.custom_not_fix_reason,
        ..original.clone()
    }
}
