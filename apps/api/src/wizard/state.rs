//! Wizard state container.
//!
//! `FormState::apply` is the only way the state changes. Each call takes one explicit
//! `Action`, performs the transition, and leaves the state ready to be rendered by
//! `wizard::view`. Navigation never performs I/O; `Submit` hands a `SubmissionDraft`
//! back to the caller, which resolves it later with `SubmitResolved`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::schema::application::ids;
use crate::schema::{FieldKind, FieldValue, FormSchema};
use crate::submission::SubmissionDraft;
use crate::wizard::validation::{first_invalid_section, validate_section, FieldErrors};

pub const GENERIC_SUBMIT_ERROR: &str =
    "There was an error submitting your application. Please try again.";

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("Wizard session {0} not found")]
    UnknownSession(uuid::Uuid),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' expects a {expected} value")]
    ValueKind {
        field: String,
        expected: &'static str,
    },

    #[error("Submit is only available from the last section")]
    NotLastSection,

    #[error("A submission is already in progress")]
    SubmitInFlight,

    #[error("No submission is in progress")]
    NoSubmitInFlight,

    #[error("This application has already been submitted")]
    AlreadySubmitted,

    #[error("This application has not been submitted")]
    NotSubmitted,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WizardStatus {
    Editing,
    Submitting,
    Submitted { record_id: String },
    Failed { message: String },
}

/// Explicit user or system action applied to the wizard.
#[derive(Debug, Clone)]
pub enum Action {
    SetValue { field: String, value: FieldValue },
    ClearValue { field: String },
    Next,
    Previous,
    Submit,
    SubmitResolved(Result<String, String>),
    DismissError,
}

/// What an action did, beyond the state change itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Updated,
    /// Validation blocked the transition; errors are now on the state.
    Invalid,
    /// Every section validated. The caller must submit the draft and resolve it.
    Ready(SubmissionDraft),
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Progress {
    pub step: usize,
    pub total: usize,
    pub fraction: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Confirmation {
    pub title: &'static str,
    pub message: &'static str,
    pub follow_up: String,
    pub record_id: String,
}

#[derive(Debug, Clone)]
pub struct FormState {
    schema: Arc<FormSchema>,
    values: HashMap<String, FieldValue>,
    section: usize,
    errors: FieldErrors,
    status: WizardStatus,
}

impl FormState {
    pub fn new(schema: Arc<FormSchema>) -> Self {
        Self {
            schema,
            values: HashMap::new(),
            section: 0,
            errors: FieldErrors::new(),
            status: WizardStatus::Editing,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn section(&self) -> usize {
        self.section
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> &WizardStatus {
        &self.status
    }

    pub fn is_last_section(&self) -> bool {
        self.section == self.schema.last_section()
    }

    pub fn progress(&self) -> Progress {
        let total = self.schema.section_count().max(1);
        let step = self.section + 1;
        Progress {
            step,
            total,
            fraction: step as f64 / total as f64,
        }
    }

    pub fn apply(&mut self, action: Action) -> Result<Outcome, WizardError> {
        match action {
            Action::SetValue { field, value } => self.set_value(field, value),
            Action::ClearValue { field } => {
                self.ensure_editable()?;
                self.known_field(&field)?;
                self.values.remove(&field);
                self.errors.remove(&field);
                Ok(Outcome::Updated)
            }
            Action::Next => self.next(),
            Action::Previous => {
                self.section = self.section.saturating_sub(1);
                Ok(Outcome::Updated)
            }
            Action::Submit => self.submit(),
            Action::SubmitResolved(result) => self.resolve(result),
            Action::DismissError => {
                if matches!(self.status, WizardStatus::Failed { .. }) {
                    self.status = WizardStatus::Editing;
                }
                Ok(Outcome::Updated)
            }
        }
    }

    /// Thank-you content, available only once the submission succeeded.
    pub fn confirmation(&self) -> Result<Confirmation, WizardError> {
        let WizardStatus::Submitted { record_id } = &self.status else {
            return Err(WizardError::NotSubmitted);
        };
        let follow_up = match self.value(ids::EMAIL).and_then(FieldValue::as_text) {
            Some(email) if !email.trim().is_empty() => format!(
                "Our team will contact you at {} to discuss next steps.",
                email.trim()
            ),
            _ => "Our team will contact you at the email address you provided to discuss next steps."
                .to_string(),
        };
        Ok(Confirmation {
            title: "Application Successfully Submitted!",
            message: "Thank you for applying. We have received your application and will review it shortly.",
            follow_up,
            record_id: record_id.clone(),
        })
    }

    fn set_value(&mut self, field: String, value: FieldValue) -> Result<Outcome, WizardError> {
        self.ensure_editable()?;
        let kind = self.known_field(&field)?;
        let expected = match kind {
            FieldKind::File => "file",
            FieldKind::Checkbox => "boolean",
            _ => "text",
        };
        let matches_kind = matches!(
            (expected, &value),
            ("file", FieldValue::File(_))
                | ("boolean", FieldValue::Bool(_))
                | ("text", FieldValue::Text(_))
        );
        if !matches_kind {
            return Err(WizardError::ValueKind { field, expected });
        }

        self.errors.remove(&field);
        self.values.insert(field, value);
        Ok(Outcome::Updated)
    }

    fn next(&mut self) -> Result<Outcome, WizardError> {
        let section = &self.schema.sections[self.section];
        let errors = validate_section(section, &self.values);
        for field in &section.fields {
            self.errors.remove(field.id);
        }
        if !errors.is_empty() {
            self.errors.extend(errors);
            return Ok(Outcome::Invalid);
        }
        if !self.is_last_section() {
            self.section += 1;
        }
        Ok(Outcome::Updated)
    }

    fn submit(&mut self) -> Result<Outcome, WizardError> {
        match self.status {
            WizardStatus::Submitting => return Err(WizardError::SubmitInFlight),
            WizardStatus::Submitted { .. } => return Err(WizardError::AlreadySubmitted),
            WizardStatus::Editing | WizardStatus::Failed { .. } => {}
        }
        if !self.is_last_section() {
            return Err(WizardError::NotLastSection);
        }

        if let Some((index, errors)) = first_invalid_section(&self.schema, &self.values) {
            self.errors = errors;
            self.section = index;
            return Ok(Outcome::Invalid);
        }

        self.errors.clear();
        self.status = WizardStatus::Submitting;
        Ok(Outcome::Ready(SubmissionDraft::new(self.values.clone())))
    }

    fn resolve(&mut self, result: Result<String, String>) -> Result<Outcome, WizardError> {
        if self.status != WizardStatus::Submitting {
            return Err(WizardError::NoSubmitInFlight);
        }
        self.status = match result {
            Ok(record_id) => WizardStatus::Submitted { record_id },
            Err(message) if message.trim().is_empty() => WizardStatus::Failed {
                message: GENERIC_SUBMIT_ERROR.to_string(),
            },
            Err(message) => WizardStatus::Failed { message },
        };
        Ok(Outcome::Updated)
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.status {
            WizardStatus::Submitting => Err(WizardError::SubmitInFlight),
            WizardStatus::Submitted { .. } => Err(WizardError::AlreadySubmitted),
            _ => Ok(()),
        }
    }

    fn known_field(&self, field: &str) -> Result<FieldKind, WizardError> {
        self.schema
            .field(field)
            .map(|f| f.kind)
            .ok_or_else(|| WizardError::UnknownField(field.to_string()))
    }
}
