//! Render model of a wizard: everything a client needs to draw the current section.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::schema::{Choice, FieldKind, FieldValue};
use crate::wizard::state::{FormState, Progress, WizardStatus};

const NO_FILE_SELECTED: &str = "No file selected";
const SUBMITTING_LABEL: &str = "Submitting...";

#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub id: Uuid,
    pub title: &'static str,
    pub description: &'static str,
    pub progress: Progress,
    pub section: SectionView,
    pub can_go_back: bool,
    pub is_last_section: bool,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
    pub status: WizardStatus,
    /// Blocking error shown after a failed submission.
    pub error_banner: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub index: usize,
    pub title: &'static str,
    pub description: Option<&'static str>,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<&'static str>,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<String>,
    pub error: Option<String>,
}

pub fn render(id: Uuid, state: &FormState) -> WizardView {
    let schema = state.schema();
    let section = &schema.sections[state.section()];
    let submitting = *state.status() == WizardStatus::Submitting;

    let fields = section
        .fields
        .iter()
        .map(|field| {
            let current = state.value(field.id);
            let value = match current {
                Some(FieldValue::Text(s)) => Value::String(s.clone()),
                Some(FieldValue::Bool(b)) => Value::Bool(*b),
                Some(FieldValue::File(_)) | None => Value::Null,
            };
            let file_info = (field.kind == FieldKind::File).then(|| {
                current
                    .and_then(FieldValue::as_file)
                    .map(|f| f.describe())
                    .unwrap_or_else(|| NO_FILE_SELECTED.to_string())
            });
            FieldView {
                id: field.id,
                label: field.label,
                kind: field.kind,
                required: field.required,
                placeholder: field.placeholder,
                options: field.options.to_vec(),
                accept: field.accept,
                value,
                file_info,
                error: state.errors().get(field.id).cloned(),
            }
        })
        .collect();

    let error_banner = match state.status() {
        WizardStatus::Failed { message } => Some(message.clone()),
        _ => None,
    };

    WizardView {
        id,
        title: schema.title,
        description: schema.description,
        progress: state.progress(),
        section: SectionView {
            index: state.section(),
            title: section.title,
            description: section.description,
            fields,
        },
        can_go_back: state.section() > 0 && !submitting,
        is_last_section: state.is_last_section(),
        submit_label: if submitting {
            SUBMITTING_LABEL
        } else {
            schema.submit_label
        },
        submit_disabled: submitting
            || matches!(state.status(), WizardStatus::Submitted { .. }),
        status: state.status().clone(),
        error_banner,
    }
}
