//! Field validation: a presence check followed by the field's rule.
//!
//! Canonical rule set (applied to every form served by this service):
//! - phone: digits plus `space - + ( ) .` separators, 10 to 15 digits
//! - age: whole number between 18 and 100
//! - identity number: `###-##-####` or nine bare digits
//!
//! Validators are pure. A returned map never contains an entry for a field that passed.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::schema::{Field, FieldKind, FieldRule, FieldValue, FormSchema, Section};

/// Field id → error message for every field that failed.
pub type FieldErrors = BTreeMap<String, String>;

pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 100;
const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;
const MIN_NAME_LEN: usize = 2;

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("validation pattern must compile"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[0-9 ()+.\-]+$")
}

fn postal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^\d{5}(-\d{4})?$")
}

fn identity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^(\d{3}-\d{2}-\d{4}|\d{9})$")
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[a-zA-Z\s'-]+$")
}

/// Validates one field against its current value. `None` means the field passed.
pub fn validate_field(field: &Field, value: Option<&FieldValue>) -> Option<String> {
    if is_empty(value) {
        return field.required.then(|| required_message(field));
    }

    let text = match value {
        Some(FieldValue::Text(s)) => s.trim(),
        // Non-empty booleans and selected files have nothing further to check.
        _ => return None,
    };

    if field.kind.is_choice() && !field.has_option(text) {
        return Some("Please select a valid option".to_string());
    }

    field.rule.and_then(|rule| check_rule(rule, text))
}

/// Applies a rule to a non-empty, trimmed value.
pub fn check_rule(rule: FieldRule, value: &str) -> Option<String> {
    let message = match rule {
        FieldRule::Email if !email_re().is_match(value) => "Please enter a valid email address",
        FieldRule::Phone if !is_phone(value) => "Please enter a valid phone number",
        FieldRule::PostalCode if !postal_re().is_match(value) => {
            "Please enter a valid ZIP code (e.g., 12345 or 12345-6789)"
        }
        FieldRule::IdentityNumber if !identity_re().is_match(value) => {
            "Please enter a valid SSN (XXX-XX-XXXX)"
        }
        FieldRule::Age => return check_age(value),
        FieldRule::PersonName => return check_name(value),
        FieldRule::Url if !(value.starts_with("http://") || value.starts_with("https://")) => {
            "Please enter a valid URL starting with http:// or https://"
        }
        FieldRule::MinLength { min, message } if value.chars().count() < min => message,
        _ => return None,
    };
    Some(message.to_string())
}

/// Validates every field of one section.
pub fn validate_section(section: &Section, values: &HashMap<String, FieldValue>) -> FieldErrors {
    section
        .fields
        .iter()
        .filter_map(|field| {
            validate_field(field, values.get(field.id)).map(|msg| (field.id.to_string(), msg))
        })
        .collect()
}

/// Validates sections in ascending order and stops at the first one that fails,
/// returning its index and errors.
pub fn first_invalid_section(
    schema: &FormSchema,
    values: &HashMap<String, FieldValue>,
) -> Option<(usize, FieldErrors)> {
    schema
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| (index, validate_section(section, values)))
        .find(|(_, errors)| !errors.is_empty())
}

fn is_empty(value: Option<&FieldValue>) -> bool {
    match value {
        None => true,
        Some(FieldValue::Text(s)) => s.trim().is_empty(),
        Some(FieldValue::Bool(b)) => !b,
        Some(FieldValue::File(_)) => false,
    }
}

fn required_message(field: &Field) -> String {
    match field.kind {
        FieldKind::Checkbox => "You must agree to the terms".to_string(),
        FieldKind::File => format!("{} image is required", field.label),
        _ => format!("{} is required", field.label),
    }
}

fn is_phone(value: &str) -> bool {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    phone_re().is_match(value) && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

fn check_age(value: &str) -> Option<String> {
    let Ok(age) = value.parse::<i64>() else {
        return Some("Age must be a number".to_string());
    };
    if age < MIN_AGE {
        return Some(format!("You must be at least {MIN_AGE} years old"));
    }
    if age > MAX_AGE {
        return Some(format!(
            "Please enter a valid age between {MIN_AGE} and {MAX_AGE}"
        ));
    }
    None
}

fn check_name(value: &str) -> Option<String> {
    if value.chars().count() < MIN_NAME_LEN {
        return Some("Name must be at least 2 characters long".to_string());
    }
    if !name_re().is_match(value) {
        return Some(
            "Name can only contain letters, spaces, hyphens and apostrophes".to_string(),
        );
    }
    None
}
