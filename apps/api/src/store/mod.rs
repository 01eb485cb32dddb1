//! Remote stores behind traits: submission records (PostgreSQL), uploaded files
//! (S3-compatible bucket) and admin sessions (Redis).
//!
//! Every service object takes these as `Arc<dyn ...>` at construction so tests can swap
//! in the in-memory fakes from `crate::testing`.

use thiserror::Error;

pub mod objects;
pub mod records;
pub mod sessions;

pub use objects::{FileUrls, ObjectStore, S3ObjectStore};
pub use records::{PgSubmissionRepository, SubmissionRepository};
pub use sessions::{RedisSessionStore, Session, SessionStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Object storage error: {0}")]
    Object(String),

    #[error("Session store error: {0}")]
    Session(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
