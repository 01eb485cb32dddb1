//! In-memory fakes of the store and adapter traits, shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::models::submission::{NewSubmission, SubmissionRecord, SubmissionSummary};
use crate::schema::application::ids;
use crate::schema::{FieldValue, FileHandle};
use crate::store::{FileUrls, ObjectStore, Session, SessionStore, StoreError, SubmissionRepository};
use crate::submission::{SubmissionAdapter, SubmissionDraft, SubmissionError};

/// A valid draft. `files` lists which file fields carry an image
/// (`dlFront` → `front.jpg`, `dlBack` → `back.jpg`).
pub fn draft_with_files(files: &[&str]) -> SubmissionDraft {
    let mut values = HashMap::new();
    for (field, value) in [
        (ids::NAME, "Jane Doe"),
        (ids::EMAIL, "jane@example.com"),
        (ids::PHONE, "555-123-4567"),
        (ids::AGE, "30"),
        (ids::ADDRESS, "12 Main Street"),
        (ids::CITY, "Columbus"),
        (ids::STATE, "Ohio"),
        (ids::ZIP, "43004"),
        (ids::SSN, "123-45-6789"),
        (ids::POSITION, "Logistics"),
        (ids::EXPERIENCE, "3-5"),
        (ids::AVAILABILITY, "Full-time"),
    ] {
        values.insert(field.to_string(), FieldValue::Text(value.to_string()));
    }
    values.insert(ids::TERMS.to_string(), FieldValue::Bool(true));
    for field in files {
        let name = if *field == ids::DL_FRONT {
            "front.jpg"
        } else {
            "back.jpg"
        };
        values.insert(field.to_string(), FieldValue::File(image(name)));
    }
    SubmissionDraft::new(values)
}

/// A 1.5 KB JPEG handle.
pub fn image(name: &str) -> FileHandle {
    FileHandle {
        name: name.to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: Bytes::from(vec![1u8; 1536]),
    }
}

pub fn sample_record(name: &str, submitted_at: DateTime<Utc>) -> NewSubmission {
    let mut submission = crate::submission::document::build_submission(
        &draft_with_files(&[]),
        None,
        None,
    );
    submission.name = vec![name.to_string()];
    submission.submitted_at = submitted_at;
    submission
}

#[derive(Default)]
pub struct FakeRecords {
    records: Mutex<Vec<SubmissionRecord>>,
    fail_with: Option<String>,
}

impl FakeRecords {
    pub fn failing(message: &str) -> Self {
        Self {
            records: Mutex::default(),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn all(&self) -> Vec<SubmissionRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionRepository for FakeRecords {
    async fn insert(&self, submission: NewSubmission) -> Result<Uuid, StoreError> {
        if let Some(message) = &self.fail_with {
            return Err(StoreError::Object(message.clone()));
        }
        let id = Uuid::new_v4();
        self.records
            .lock()
            .unwrap()
            .push(into_record(submission, id));
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<SubmissionSummary>, StoreError> {
        let mut records = self.all();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records.iter().map(SubmissionSummary::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SubmissionRecord>, StoreError> {
        Ok(self.all().into_iter().find(|r| r.id == id))
    }
}

#[derive(Default)]
pub struct FakeObjectStore {
    files: Mutex<HashMap<String, FileHandle>>,
    fail_on_name: Option<String>,
}

impl FakeObjectStore {
    /// Uploads of a file with this name fail.
    pub fn failing_on(name: &str) -> Self {
        Self {
            files: Mutex::default(),
            fail_on_name: Some(name.to_string()),
        }
    }

    pub fn uploaded_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn upload(&self, file: &FileHandle) -> Result<String, StoreError> {
        if self.fail_on_name.as_deref() == Some(file.name.as_str()) {
            return Err(StoreError::Object(format!("upload of {} rejected", file.name)));
        }
        let id = Uuid::new_v4().to_string();
        self.files.lock().unwrap().insert(id.clone(), file.clone());
        Ok(id)
    }

    async fn file_urls(&self, file_id: &str) -> Result<FileUrls, StoreError> {
        if !self.files.lock().unwrap().contains_key(file_id) {
            return Err(StoreError::Object(format!("file {file_id} not found")));
        }
        Ok(FileUrls {
            preview_url: format!("https://files.test/{file_id}/preview"),
            download_url: format!("https://files.test/{file_id}/download"),
        })
    }
}

#[derive(Default)]
pub struct FakeSessions {
    sessions: Mutex<HashMap<String, Session>>,
}

#[async_trait]
impl SessionStore for FakeSessions {
    async fn put(&self, session: &Session, _ttl: Duration) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(token)
            .filter(|s| s.expires_at > Utc::now())
            .cloned())
    }

    async fn remove(&self, token: &str) -> Result<(), StoreError> {
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }
}

/// Adapter that records calls and returns a fixed result. With a gate, each call waits
/// for `release()` before returning.
pub struct FakeAdapter {
    calls: AtomicUsize,
    result: Result<String, String>,
    gate: Option<Arc<Notify>>,
}

impl FakeAdapter {
    pub fn succeeding(record_id: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result: Ok(record_id.to_string()),
            gate: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result: Err(message.to_string()),
            gate: None,
        }
    }

    pub fn gated(record_id: &str) -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::succeeding(record_id)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl SubmissionAdapter for FakeAdapter {
    async fn submit(&self, _draft: &SubmissionDraft) -> Result<String, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone().map_err(SubmissionError::Relay)
    }

    fn backend(&self) -> &'static str {
        "fake"
    }
}

/// The record a real store would hold after inserting `s` under `id`.
fn into_record(s: NewSubmission, id: Uuid) -> SubmissionRecord {
    SubmissionRecord {
        id,
        name: s.name,
        email: s.email,
        phone: s.phone,
        address: s.address,
        city: s.city,
        state: s.state,
        zip: s.zip,
        ssn: s.ssn,
        age: s.age,
        position: s.position,
        experience: s.experience,
        availability: s.availability,
        resume_url: s.resume_url,
        additional_info: s.additional_info,
        dl_front_id: s.dl_front_id,
        dl_back_id: s.dl_back_id,
        permissions: s.permissions,
        submitted_at: s.submitted_at,
    }
}
