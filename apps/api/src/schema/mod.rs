//! Form schema: the static description of the application form.
//!
//! A `FormSchema` is built once at startup and shared behind an `Arc`. Nothing in the
//! wizard mutates it; the wizard state only ever refers to fields by id.

use serde::Serialize;

pub mod application;
pub mod values;

pub use values::{FieldValue, FileHandle};

/// Input widget a field renders as. Drives the presence check and the value kind the
/// wizard accepts for the field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    ShortText,
    Email,
    Phone,
    Number,
    Select,
    Radio,
    Checkbox,
    TextArea,
    File,
}

impl FieldKind {
    /// Single-choice kinds carry an option set and reject values outside it.
    pub fn is_choice(self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::Radio)
    }
}

/// Semantic check applied after the presence check passes on a non-empty value.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    Email,
    Phone,
    PostalCode,
    IdentityNumber,
    Age,
    PersonName,
    Url,
    MinLength {
        min: usize,
        message: &'static str,
    },
}

/// One selectable option of a select or radio field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

impl Choice {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }

    /// Option whose stored value is its label.
    pub const fn same(value: &'static str) -> Self {
        Self {
            value,
            label: value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [Choice],
    /// Browser `accept` hint for file inputs. Cosmetic; never enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<FieldRule>,
}

impl Field {
    pub fn new(id: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            kind,
            required: false,
            placeholder: None,
            options: &[],
            accept: None,
            rule: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn options(mut self, options: &'static [Choice]) -> Self {
        self.options = options;
        self
    }

    pub fn accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|c| c.value == value)
    }
}

fn no_options(options: &&'static [Choice]) -> bool {
    options.is_empty()
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    pub title: &'static str,
    pub description: &'static str,
    pub submit_label: &'static str,
    pub sections: Vec<Section>,
}

impl FormSchema {
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn last_section(&self) -> usize {
        self.sections.len().saturating_sub(1)
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields().find(|f| f.id == id)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }
}
