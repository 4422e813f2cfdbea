//! Bug form state container.
//!
//! All changes go through [`FormState::update`], a reducer over [`FormMsg`].
//! The custom not-fix reason rule runs inside the reducer whenever the
//! selected reason or the loaded reason list changes, so it can be tested
//! without any UI. Opening the form does not run it: in edit mode the reason
//! list usually arrives after the record.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::api::{Bug, ReferenceOptions};

use super::options::{Generation, OptionLoader};
use super::policy;
use super::submit::{build_create, build_update, Submission};
use super::values::{BugFormValues, DateRange, FormMode};

/// Creator id attached to new bugs when none is configured.
pub const DEFAULT_CREATOR: &str = "currentUser";

/// Fields of the bug form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Description,
    BugType,
    Assignee,
    Verifier,
    Severity,
    Priority,
    Project,
    Iteration,
    Participants,
    Cc,
    Tags,
    NotFixReason,
    CustomNotFixReason,
    PlannedRange,
}

impl FormField {
    /// Get the display label for this field.
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::BugType => "Type",
            FormField::Assignee => "Assignee",
            FormField::Verifier => "Verifier",
            FormField::Severity => "Severity",
            FormField::Priority => "Priority",
            FormField::Project => "Project",
            FormField::Iteration => "Iteration",
            FormField::Participants => "Participants",
            FormField::Cc => "CC",
            FormField::Tags => "Tags",
            FormField::NotFixReason => "Not-fix reason",
            FormField::CustomNotFixReason => "Custom reason",
            FormField::PlannedRange => "Planned dates",
        }
    }
}

/// A validation message attached to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

/// Reasons a submission was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    /// One or more fields are invalid.
    #[error("Please fix {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The previous submission has not finished.
    #[error("A save is already in progress")]
    Busy,

    /// Edit mode was opened without a bug.
    #[error("No bug is loaded for editing")]
    MissingRecord,

    /// The form is closed.
    #[error("The form is not open")]
    Closed,
}

/// A change to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMsg {
    SetTitle(String),
    SetDescription(String),
    SetBugType(Option<String>),
    SetAssignee(Option<String>),
    SetVerifier(Option<String>),
    SetPriority(Option<String>),
    SetProject(Option<String>),
    SetIteration(Option<String>),
    SetSeverity(Option<String>),
    SetParticipants(Vec<String>),
    SetCc(Vec<String>),
    SetTags(Vec<String>),
    SetPlannedRange(Option<DateRange>),
    SetNotFixReason(Option<String>),
    SetCustomNotFixReason(String),
    /// Replace the reference lists.
    OptionsLoaded(ReferenceOptions),
}

/// State of the bug form in either mode.
#[derive(Debug, Clone)]
pub struct FormState {
    open: bool,
    mode: FormMode,
    values: BugFormValues,
    original: Option<Bug>,
    options: ReferenceOptions,
    loader: OptionLoader,
    errors: Vec<FieldError>,
    loading: bool,
    creator: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(DEFAULT_CREATOR)
    }
}

impl FormState {
    /// Create a closed form that stamps new bugs with `creator`.
    pub fn new(creator: impl Into<String>) -> Self {
        Self {
            open: false,
            mode: FormMode::Create,
            values: BugFormValues::default(),
            original: None,
            options: ReferenceOptions::default(),
            loader: OptionLoader::new(),
            errors: Vec::new(),
            loading: false,
            creator: creator.into(),
        }
    }

    /// Open the form.
    ///
    /// In edit mode every field is copied from `initial`; otherwise, or when
    /// no record is given, the fields reset to defaults. Returns the
    /// generation the caller should tag its option load with.
    pub fn open(&mut self, mode: FormMode, initial: Option<Bug>) -> Generation {
        self.open = true;
        self.mode = mode;
        self.errors.clear();
        self.loading = false;

        match (mode, initial) {
            (FormMode::Edit, Some(bug)) => {
                debug!(id = %bug.id, "Opening bug form for edit");
                self.values = BugFormValues::from_bug(&bug);
                self.original = Some(bug);
            }
            (mode, _) => {
                debug!(mode = mode.display_name(), "Opening empty bug form");
                self.values = BugFormValues::default();
                self.original = None;
            }
        }

        self.loader.begin()
    }

    /// Open the form for a new bug.
    pub fn open_create(&mut self) -> Generation {
        self.open(FormMode::Create, None)
    }

    /// Open the form for an existing bug.
    pub fn open_edit(&mut self, bug: Bug) -> Generation {
        self.open(FormMode::Edit, Some(bug))
    }

    /// Close the form, discarding values and invalidating pending loads.
    pub fn close(&mut self) {
        debug!("Closing bug form");
        self.open = false;
        self.values = BugFormValues::default();
        self.original = None;
        self.errors.clear();
        self.loading = false;
        self.loader.cancel();
    }

    /// Check if the form is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Get the form mode.
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Get the current values.
    pub fn values(&self) -> &BugFormValues {
        &self.values
    }

    /// Get the bug being edited.
    pub fn original(&self) -> Option<&Bug> {
        self.original.as_ref()
    }

    /// Get the loaded reference lists.
    pub fn options(&self) -> &ReferenceOptions {
        &self.options
    }

    /// Get the current validation errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Get the validation error for a field, if any.
    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Set whether the caller is saving; submit is refused while set.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Check whether the caller is saving.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Check whether reference lists are still loading.
    pub fn is_loading_options(&self) -> bool {
        self.loader.is_loading()
    }

    /// Generation of the latest option load.
    pub fn option_generation(&self) -> Generation {
        self.loader.generation()
    }

    /// Set the creator id attached to new bugs.
    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.creator = creator.into();
    }

    /// Check whether the custom reason field should be shown.
    pub fn custom_reason_visible(&self) -> bool {
        policy::custom_reason_visible(
            self.values.not_fix_reason.as_deref(),
            &self.options.not_fix_reasons,
        )
    }

    /// Apply a change.
    pub fn update(&mut self, msg: FormMsg) {
        let v = &mut self.values;
        match msg {
            FormMsg::SetTitle(title) => {
                v.title = title;
                if !v.title.trim().is_empty() {
                    self.errors.retain(|e| e.field != FormField::Title);
                }
            }
            FormMsg::SetDescription(description) => v.description = description,
            FormMsg::SetBugType(id) => v.bug_type = id,
            FormMsg::SetAssignee(id) => v.assignee = id,
            FormMsg::SetVerifier(id) => v.verifier = id,
            FormMsg::SetPriority(id) => v.priority = id,
            FormMsg::SetProject(id) => v.project = id,
            FormMsg::SetIteration(id) => v.iteration = id,
            FormMsg::SetSeverity(id) => v.severity = id,
            FormMsg::SetParticipants(ids) => v.participants = ids,
            FormMsg::SetCc(ids) => v.cc = ids,
            FormMsg::SetTags(tags) => v.tags = tags,
            FormMsg::SetPlannedRange(range) => v.planned = range,
            FormMsg::SetNotFixReason(id) => {
                v.not_fix_reason = id;
                self.enforce_custom_reason();
            }
            FormMsg::SetCustomNotFixReason(text) => {
                v.custom_not_fix_reason = text;
                self.enforce_custom_reason();
            }
            FormMsg::OptionsLoaded(options) => {
                self.options = options;
                self.enforce_custom_reason();
            }
        }
    }

    /// Apply a resolved option load.
    ///
    /// Stale or failed loads leave the options unchanged. A failed load of
    /// the current generation still settles the custom reason against the
    /// lists on hand. Returns `true` if the options were replaced.
    pub fn apply_options(
        &mut self,
        generation: Generation,
        result: Result<ReferenceOptions, String>,
    ) -> bool {
        let current = generation == self.loader.generation();
        let failed = result.is_err();
        match self.loader.resolve(generation, result) {
            Some(options) if self.open => {
                self.update(FormMsg::OptionsLoaded(options));
                true
            }
            _ => {
                if current && failed && self.open {
                    self.enforce_custom_reason();
                }
                false
            }
        }
    }

    fn enforce_custom_reason(&mut self) {
        let changed = policy::enforce_custom_reason(
            self.values.not_fix_reason.as_deref(),
            &self.options.not_fix_reasons,
            &mut self.values.custom_not_fix_reason,
        );
        if changed {
            debug!("Cleared custom not-fix reason");
        }
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), FormError> {
        let mut errors = Vec::new();
        if self.values.title.trim().is_empty() {
            errors.push(FieldError::new(FormField::Title, "Please enter a title"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Validation(errors))
        }
    }

    /// Validate and build the payload for the caller to save.
    ///
    /// Validation failures are stored for display and returned.
    pub fn submit(&mut self) -> Result<Submission, FormError> {
        if !self.open {
            return Err(FormError::Closed);
        }
        if self.loading {
            return Err(FormError::Busy);
        }

        if let Err(e) = self.validate() {
            if let FormError::Validation(errors) = &e {
                self.errors = errors.clone();
            }
            debug!(error = %e, "Bug form validation failed");
            return Err(e);
        }
        self.errors.clear();

        let submission = match self.mode {
            FormMode::Create => Submission::Create(build_create(&self.values, &self.creator)),
            FormMode::Edit => {
                let original = self.original.as_ref().ok_or(FormError::MissingRecord)?;
                Submission::Update(build_update(&self.values, original))
            }
        };
        info!(
            mode = self.mode.display_name(),
            title = submission.title(),
            "Bug form submitted"
        );
        Ok(submission)
    }
}
