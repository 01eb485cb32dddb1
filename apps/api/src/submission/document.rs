use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::models::submission::{NewSubmission, NARROW_COLUMN_WIDTH, OPEN_ACCESS};
use crate::schema::application::ids;
use crate::store::{ObjectStore, SubmissionRepository};
use crate::submission::{SubmissionAdapter, SubmissionDraft, SubmissionError};

/// Writes the application as a document record, with the identity-document images
/// uploaded to object storage first.
pub struct DocumentStoreAdapter {
    records: Arc<dyn SubmissionRepository>,
    objects: Arc<dyn ObjectStore>,
}

impl DocumentStoreAdapter {
    pub fn new(records: Arc<dyn SubmissionRepository>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { records, objects }
    }

    /// Uploads one file field. Failures are logged and yield `None`; they never abort
    /// the submission.
    async fn upload_best_effort(&self, draft: &SubmissionDraft, field: &str) -> Option<String> {
        let file = draft.file(field)?;
        match self.objects.upload(file).await {
            Ok(file_id) => {
                info!("Uploaded {field} as file {file_id}");
                Some(file_id)
            }
            Err(e) => {
                warn!("Upload of {field} failed, continuing without it: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl SubmissionAdapter for DocumentStoreAdapter {
    async fn submit(&self, draft: &SubmissionDraft) -> Result<String, SubmissionError> {
        let (dl_front_id, dl_back_id) = tokio::join!(
            self.upload_best_effort(draft, ids::DL_FRONT),
            self.upload_best_effort(draft, ids::DL_BACK),
        );

        let submission = build_submission(draft, dl_front_id, dl_back_id);
        let id = self.records.insert(submission).await?;
        Ok(id.to_string())
    }

    fn backend(&self) -> &'static str {
        "document"
    }
}

/// Maps validated form values onto the stored record shape.
pub fn build_submission(
    draft: &SubmissionDraft,
    dl_front_id: Option<String>,
    dl_back_id: Option<String>,
) -> NewSubmission {
    NewSubmission {
        name: vec![draft.text(ids::NAME).to_string()],
        email: draft.text(ids::EMAIL).to_string(),
        phone: draft.text(ids::PHONE).to_string(),
        address: draft.text(ids::ADDRESS).to_string(),
        city: draft.text(ids::CITY).to_string(),
        state: draft.text(ids::STATE).to_string(),
        zip: draft.text(ids::ZIP).to_string(),
        ssn: truncate(draft.text(ids::SSN), NARROW_COLUMN_WIDTH),
        age: draft.text(ids::AGE).parse().unwrap_or(0),
        position: truncate(draft.text(ids::POSITION), NARROW_COLUMN_WIDTH),
        experience: draft.text(ids::EXPERIENCE).to_string(),
        availability: draft.text(ids::AVAILABILITY).to_string(),
        resume_url: draft.optional_text(ids::RESUME).map(String::from),
        additional_info: draft.optional_text(ids::ADDITIONAL_INFO).map(String::from),
        dl_front_id,
        dl_back_id,
        permissions: OPEN_ACCESS.iter().map(|p| p.to_string()).collect(),
        submitted_at: Utc::now(),
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
