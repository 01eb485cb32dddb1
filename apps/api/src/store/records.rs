use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::submission::{NewSubmission, SubmissionRecord, SubmissionSummary};
use crate::store::StoreError;

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Writes a new record and returns its generated id. Records are never updated.
    async fn insert(&self, submission: NewSubmission) -> Result<Uuid, StoreError>;

    /// All submissions, most recent first.
    async fn list(&self) -> Result<Vec<SubmissionSummary>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<SubmissionRecord>, StoreError>;
}

#[derive(Clone)]
pub struct PgSubmissionRepository {
    pool: PgPool,
}

impl PgSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SummaryRow {
    id: Uuid,
    name: Vec<String>,
    email: String,
    position: String,
    submitted_at: DateTime<Utc>,
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    async fn insert(&self, s: NewSubmission) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO submissions
                (id, name, email, phone, address, city, state, zip, ssn, age,
                 position, experience, availability, resume_url, additional_info,
                 dl_front_id, dl_back_id, permissions, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(id)
        .bind(&s.name)
        .bind(&s.email)
        .bind(&s.phone)
        .bind(&s.address)
        .bind(&s.city)
        .bind(&s.state)
        .bind(&s.zip)
        .bind(&s.ssn)
        .bind(s.age)
        .bind(&s.position)
        .bind(&s.experience)
        .bind(&s.availability)
        .bind(&s.resume_url)
        .bind(&s.additional_info)
        .bind(&s.dl_front_id)
        .bind(&s.dl_back_id)
        .bind(&s.permissions)
        .bind(s.submitted_at)
        .execute(&self.pool)
        .await?;

        info!("Inserted submission {id}");
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<SubmissionSummary>, StoreError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT id, name, email, position, submitted_at FROM submissions ORDER BY submitted_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SubmissionSummary::new(r.id, &r.name, r.email, r.position, r.submitted_at))
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SubmissionRecord>, StoreError> {
        Ok(
            sqlx::query_as::<_, SubmissionRecord>("SELECT * FROM submissions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}
