//! Submission adapters: the single seam between a completed wizard and a backend.
//!
//! `WizardService` carries an `Arc<dyn SubmissionAdapter>` chosen at startup from
//! `SUBMISSION_BACKEND`. Callers only see `submit(draft) -> record id`; they never know
//! which backend answered.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::schema::{FieldValue, FileHandle};
use crate::store::StoreError;

pub mod document;
pub mod relay;

pub use document::DocumentStoreAdapter;
pub use relay::EmailRelayAdapter;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The relay answered with anything other than an explicit success.
    #[error("{0}")]
    Relay(String),

    #[error("Email relay request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Snapshot of the wizard values taken when every section validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionDraft {
    values: HashMap<String, FieldValue>,
}

impl SubmissionDraft {
    pub fn new(values: HashMap<String, FieldValue>) -> Self {
        Self { values }
    }

    /// Trimmed text value, or `""` when the field is absent or not text.
    pub fn text(&self, field: &str) -> &str {
        self.values
            .get(field)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .unwrap_or_default()
    }

    /// Text value, `None` when absent or blank.
    pub fn optional_text(&self, field: &str) -> Option<&str> {
        Some(self.text(field)).filter(|s| !s.is_empty())
    }

    pub fn file(&self, field: &str) -> Option<&FileHandle> {
        self.values.get(field).and_then(FieldValue::as_file)
    }
}

#[async_trait]
pub trait SubmissionAdapter: Send + Sync {
    /// Persists or dispatches one application. Returns the identifier of what was created.
    async fn submit(&self, draft: &SubmissionDraft) -> Result<String, SubmissionError>;

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}
