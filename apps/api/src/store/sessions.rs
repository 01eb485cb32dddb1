use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

const SESSION_KEY_PREFIX: &str = "intake:admin_session";

/// An authenticated admin session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, session: &Session, ttl: Duration) -> Result<(), StoreError>;

    /// Returns the session for a token, `None` if it never existed or has expired.
    async fn get(&self, token: &str) -> Result<Option<Session>, StoreError>;

    async fn remove(&self, token: &str) -> Result<(), StoreError>;
}

/// Sessions as JSON strings under `intake:admin_session:<token>`, expired by Redis.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn key(token: &str) -> String {
        format!("{SESSION_KEY_PREFIX}:{token}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, session: &Session, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(session)?;
        redis::cmd("SET")
            .arg(Self::key(&session.token))
            .arg(payload)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(Self::key(token))
            .query_async(&mut conn)
            .await?;
        payload
            .map(|p| serde_json::from_str(&p).map_err(StoreError::from))
            .transpose()
    }

    async fn remove(&self, token: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("DEL")
            .arg(Self::key(token))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
