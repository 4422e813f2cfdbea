//! Data types for bugs and the reference lists used by the bug form.
//!
//! Every string field uses `""` for "unset" and every list field uses `[]`,
//! mirroring the shape the repository stores and returns. Serialized keys are
//! camelCase.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status assigned to every newly created bug.
pub const STATUS_NEW: &str = "new";

/// A tracked bug record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Bug {
    /// Identifier assigned by the repository (e.g. "BUG-001").
    pub id: String,
    /// Short summary.
    pub title: String,
    /// Markdown description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// User id of the assignee.
    pub assignee: String,
    /// User id of the creator.
    pub creator: String,
    /// Creation date assigned by the repository.
    pub created_at: String,
    /// Bug type id.
    #[serde(rename = "type")]
    pub bug_type: String,
    /// Priority id.
    pub priority: String,
    /// Iteration id.
    pub iteration: String,
    /// Planned start date (`YYYY-MM-DD` or empty).
    pub planned_start_date: String,
    /// Planned end date (`YYYY-MM-DD` or empty).
    pub planned_end_date: String,
    /// Completion date (`YYYY-MM-DD` or empty).
    pub completion_date: String,
    /// User id of the verifier.
    pub verifier: String,
    /// Project id.
    pub project: String,
    /// Severity id.
    pub severity: String,
    /// User ids of participants.
    pub participants: Vec<String>,
    /// User ids copied on changes.
    pub cc: Vec<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Not-fix reason id.
    pub not_fix_reason: String,
    /// Free-text reason, only meaningful for a custom not-fix reason.
    pub custom_not_fix_reason: String,
}

/// Payload for creating a bug: a [`Bug`] without `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub status: String,
    pub assignee: String,
    pub creator: String,
    #[serde(rename = "type")]
    pub bug_type: String,
    pub priority: String,
    pub iteration: String,
    pub planned_start_date: String,
    pub planned_end_date: String,
    pub completion_date: String,
    pub verifier: String,
    pub project: String,
    pub severity: String,
    pub participants: Vec<String>,
    pub cc: Vec<String>,
    pub tags: Vec<String>,
    pub not_fix_reason: String,
    pub custom_not_fix_reason: String,
}

impl NewBug {
    /// Turn the payload into a stored record with the given identity.
    pub fn into_bug(self, id: String, created_at: String) -> Bug {
        Bug {
            id,
            created_at,
            title: self.title,
            description: self.description,
            status: self.status,
            assignee: self.assignee,
            creator: self.creator,
            bug_type: self.bug_type,
            priority: self.priority,
            iteration: self.iteration,
            planned_start_date: self.planned_start_date,
            planned_end_date: self.planned_end_date,
            completion_date: self.completion_date,
            verifier: self.verifier,
            project: self.project,
            severity: self.severity,
            participants: self.participants,
            cc: self.cc,
            tags: self.tags,
            not_fix_reason: self.not_fix_reason,
            custom_not_fix_reason: self.custom_not_fix_reason,
        }
    }
}

/// An entry of a reference list (user, project, iteration, priority,
/// severity or bug type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOption {
    /// Identifier stored on bugs.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl ReferenceOption {
    /// Create a new reference option.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A reason for not fixing a bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFixReason {
    pub id: String,
    pub name: String,
    /// Whether this reason permits a free-text elaboration.
    pub is_custom: bool,
}

impl NotFixReason {
    /// Create a new not-fix reason.
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_custom: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_custom,
        }
    }
}

/// The seven reference lists used to populate the bug form's selectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceOptions {
    pub users: Vec<ReferenceOption>,
    pub projects: Vec<ReferenceOption>,
    pub iterations: Vec<ReferenceOption>,
    pub priorities: Vec<ReferenceOption>,
    pub severities: Vec<ReferenceOption>,
    pub bug_types: Vec<ReferenceOption>,
    pub not_fix_reasons: Vec<NotFixReason>,
}

impl ReferenceOptions {
    /// Look up a user's display name.
    pub fn user_name(&self, id: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.name.as_str())
    }

    /// Look up a not-fix reason by id.
    pub fn not_fix_reason(&self, id: &str) -> Option<&NotFixReason> {
        self.not_fix_reasons.iter().find(|r| r.id == id)
    }

    /// Check whether every list is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.projects.is_empty()
            && self.iterations.is_empty()
            && self.priorities.is_empty()
            && self.severities.is_empty()
            && self.bug_types.is_empty()
            && self.not_fix_reasons.is_empty()
    }
}

/// Identifies one of the reference lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Users,
    Projects,
    Iterations,
    Priorities,
    Severities,
    BugTypes,
    NotFixReasons,
}

impl OptionKind {
    /// All reference list kinds, in loading order.
    pub const ALL: [OptionKind; 7] = [
        OptionKind::Users,
        OptionKind::Projects,
        OptionKind::Iterations,
        OptionKind::Priorities,
        OptionKind::Severities,
        OptionKind::BugTypes,
        OptionKind::NotFixReasons,
    ];
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Users => "users",
            OptionKind::Projects => "projects",
            OptionKind::Iterations => "iterations",
            OptionKind::Priorities => "priorities",
            OptionKind::Severities => "severities",
            OptionKind::BugTypes => "bug types",
            OptionKind::NotFixReasons => "not-fix reasons",
        };
        f.write_str(name)
    }
}
