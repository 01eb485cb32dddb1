use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Record-level permissions written with every submission: any caller may read and any
/// caller may write. This is the access model the application form has always shipped
/// with and it exposes applicant PII (including the identity number) to anyone who can
/// reach the store. It is kept as an explicit value so that tightening it is a visible,
/// deliberate change rather than a storage default.
pub const OPEN_ACCESS: [&str; 2] = ["read:any", "write:any"];

/// Columns whose storage width is capped; longer input is truncated before insert.
pub const NARROW_COLUMN_WIDTH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub name: Vec<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub ssn: String,
    pub age: i32,
    pub position: String,
    pub experience: String,
    pub availability: String,
    pub resume_url: Option<String>,
    pub additional_info: Option<String>,
    pub dl_front_id: Option<String>,
    pub dl_back_id: Option<String>,
    pub permissions: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

/// A record ready to be written. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub name: Vec<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub ssn: String,
    pub age: i32,
    pub position: String,
    pub experience: String,
    pub availability: String,
    pub resume_url: Option<String>,
    pub additional_info: Option<String>,
    pub dl_front_id: Option<String>,
    pub dl_back_id: Option<String>,
    pub permissions: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

/// One row of the admin submission list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub position: String,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionSummary {
    pub fn new(
        id: Uuid,
        name: &[String],
        email: String,
        position: String,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: display_name(name),
            email,
            position,
            submitted_at,
        }
    }
}

impl From<&SubmissionRecord> for SubmissionSummary {
    fn from(record: &SubmissionRecord) -> Self {
        Self::new(
            record.id,
            &record.name,
            record.email.clone(),
            record.position.clone(),
            record.submitted_at,
        )
    }
}

/// Names are stored as a list; an empty list displays as `N/A`.
pub fn display_name(name: &[String]) -> String {
    if name.is_empty() {
        "N/A".to_string()
    } else {
        name.join(", ")
    }
}
