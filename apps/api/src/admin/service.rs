use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::submission::{SubmissionRecord, SubmissionSummary};
use crate::store::{ObjectStore, Session, SessionStore, StoreError, SubmissionRepository};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const FILE_UNAVAILABLE: &str = "Error loading image";

/// Login and session failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures reading stored submissions.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Submission {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The single admin account, taken from configuration.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl AdminCredentials {
    /// Email is matched case-insensitively; the password compare is constant-time and both
    /// checks always run.
    fn matches(&self, email: &str, password: &str) -> bool {
        let email_ok = self.email.eq_ignore_ascii_case(email.trim());
        let password_ok = bool::from(self.password.as_bytes().ct_eq(password.as_bytes()));
        email_ok & password_ok
    }
}

/// Resolution of one stored file reference for the detail view.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilePreview {
    Available {
        file_id: String,
        preview_url: String,
        download_url: String,
    },
    Unavailable {
        file_id: String,
        message: &'static str,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub record: SubmissionRecord,
    pub display_name: String,
    pub dl_front: Option<FilePreview>,
    pub dl_back: Option<FilePreview>,
}

#[derive(Clone)]
pub struct AdminService {
    sessions: Arc<dyn SessionStore>,
    records: Arc<dyn SubmissionRepository>,
    objects: Arc<dyn ObjectStore>,
    credentials: AdminCredentials,
    session_ttl: Duration,
}

impl AdminService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        records: Arc<dyn SubmissionRepository>,
        objects: Arc<dyn ObjectStore>,
        credentials: AdminCredentials,
        session_ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            records,
            objects,
            credentials,
            session_ttl,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if !self.credentials.matches(email, password) {
            warn!("Rejected admin login for {}", email.trim());
            return Err(AuthError::InvalidCredentials);
        }

        let created_at = Utc::now();
        let ttl = chrono::Duration::from_std(self.session_ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(8));
        let session = Session {
            token: Uuid::new_v4().to_string(),
            email: self.credentials.email.clone(),
            created_at,
            expires_at: created_at + ttl,
        };
        self.sessions.put(&session, self.session_ttl).await?;
        info!("Admin {} logged in", session.email);
        Ok(session)
    }

    pub async fn current_session(&self, token: &str) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.get(token).await?)
    }

    /// Ends the session. Unknown or already-expired tokens are not an error.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.remove(token).await?;
        Ok(())
    }

    pub async fn list_submissions(&self) -> Result<Vec<SubmissionSummary>, ReadError> {
        Ok(self.records.list().await?)
    }

    pub async fn get_submission(&self, id: Uuid) -> Result<SubmissionDetail, ReadError> {
        let record = self
            .records
            .get(id)
            .await?
            .ok_or(ReadError::NotFound(id))?;

        let (dl_front, dl_back) = tokio::join!(
            self.preview(record.dl_front_id.as_deref()),
            self.preview(record.dl_back_id.as_deref())
        );

        Ok(SubmissionDetail {
            display_name: crate::models::submission::display_name(&record.name),
            record,
            dl_front,
            dl_back,
        })
    }

    async fn preview(&self, file_id: Option<&str>) -> Option<FilePreview> {
        let file_id = file_id?;
        Some(match self.objects.file_urls(file_id).await {
            Ok(urls) => FilePreview::Available {
                file_id: file_id.to_string(),
                preview_url: urls.preview_url,
                download_url: urls.download_url,
            },
            Err(e) => {
                warn!("Could not resolve file {file_id}: {e}");
                FilePreview::Unavailable {
                    file_id: file_id.to_string(),
                    message: FILE_UNAVAILABLE,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::testing::{sample_record, FakeObjectStore, FakeRecords, FakeSessions};

    fn admin(records: Arc<FakeRecords>, objects: Arc<FakeObjectStore>) -> AdminService {
        AdminService::new(
            Arc::new(FakeSessions::default()),
            records,
            objects,
            AdminCredentials {
                email: "admin@akg.test".to_string(),
                password: "hunter2".to_string(),
            },
            Duration::from_secs(3600),
        )
    }

    #[tokio::test]
    async fn test_login_then_session_recheck_then_logout() {
        let service = admin(Arc::default(), Arc::default());

        let session = service.login(" Admin@AKG.test ", "hunter2").await.unwrap();
        assert_eq!(session.email, "admin@akg.test");
        assert!(session.expires_at > session.created_at);

        let current = service.current_session(&session.token).await.unwrap();
        assert_eq!(current, Some(session.clone()));

        service.logout(&session.token).await.unwrap();
        service.logout(&session.token).await.unwrap();
        assert!(service
            .current_session(&session.token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let service = admin(Arc::default(), Arc::default());
        let err = service.login("admin@akg.test", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), INVALID_CREDENTIALS);
    }

    #[test]
    fn test_credentials_reject_password_prefix_and_extension() {
        let credentials = AdminCredentials {
            email: "admin@akg.test".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(credentials.matches("ADMIN@akg.test", "hunter2"));
        assert!(!credentials.matches("admin@akg.test", "hunter"));
        assert!(!credentials.matches("admin@akg.test", "hunter22"));
        assert!(!credentials.matches("admin@akg.test", ""));
        assert!(!credentials.matches("other@akg.test", "hunter2"));
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let records = Arc::new(FakeRecords::default());
        let older = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        records.insert(sample_record("Older", older)).await.unwrap();
        records.insert(sample_record("Newer", newer)).await.unwrap();

        let list = admin(records, Arc::default()).list_submissions().await.unwrap();

        let names: Vec<_> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_detail_degrades_per_file() {
        let records = Arc::new(FakeRecords::default());
        let objects = Arc::new(FakeObjectStore::default());
        let front_id = objects
            .upload(&crate::testing::image("front.jpg"))
            .await
            .unwrap();
        let mut record = sample_record("Jane Doe", Utc::now());
        record.dl_front_id = Some(front_id.clone());
        record.dl_back_id = Some("missing-file".to_string());
        let id = records.insert(record).await.unwrap();

        let detail = admin(records, objects).get_submission(id).await.unwrap();

        assert_eq!(
            detail.dl_front,
            Some(FilePreview::Available {
                file_id: front_id.clone(),
                preview_url: format!("https://files.test/{front_id}/preview"),
                download_url: format!("https://files.test/{front_id}/download"),
            })
        );
        assert_eq!(
            detail.dl_back,
            Some(FilePreview::Unavailable {
                file_id: "missing-file".to_string(),
                message: FILE_UNAVAILABLE,
            })
        );
        assert_eq!(detail.display_name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_detail_without_files_and_unknown_id() {
        let records = Arc::new(FakeRecords::default());
        let id = records
            .insert(sample_record("Jane Doe", Utc::now()))
            .await
            .unwrap();
        let service = admin(records, Arc::default());

        let detail = service.get_submission(id).await.unwrap();
        assert!(detail.dl_front.is_none());
        assert!(detail.dl_back.is_none());

        let missing = Uuid::new_v4();
        assert!(matches!(
            service.get_submission(missing).await.unwrap_err(),
            ReadError::NotFound(id) if id == missing
        ));
    }
}
