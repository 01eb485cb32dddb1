use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::schema::FileHandle;
use crate::store::StoreError;

const UPLOAD_PREFIX: &str = "uploads";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileUrls {
    pub preview_url: String,
    pub download_url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores the file and returns its opaque file id.
    async fn upload(&self, file: &FileHandle) -> Result<String, StoreError>;

    /// Resolves a file id into time-limited inline preview and attachment download URLs.
    /// Fails when the object does not exist.
    async fn file_urls(&self, file_id: &str) -> Result<FileUrls, StoreError>;
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    url_ttl: Duration,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, url_ttl: Duration) -> Self {
        Self {
            client,
            bucket,
            url_ttl,
        }
    }

    fn key(file_id: &str) -> String {
        format!("{UPLOAD_PREFIX}/{file_id}")
    }

    async fn presign(&self, key: &str, disposition: String) -> Result<String, StoreError> {
        let config = PresigningConfig::expires_in(self.url_ttl)
            .map_err(|e| StoreError::Object(format!("invalid presign ttl: {e}")))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition(disposition)
            .presigned(config)
            .await
            .map_err(|e| StoreError::Object(format!("presign failed for {key}: {e}")))?;
        Ok(request.uri().to_string())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, file: &FileHandle) -> Result<String, StoreError> {
        let file_id = Uuid::new_v4().to_string();
        let key = Self::key(&file_id);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(file.bytes.clone()))
            .content_type(&file.content_type)
            .send()
            .await
            .map_err(|e| StoreError::Object(format!("upload of {} failed: {e}", file.name)))?;

        info!(
            "Uploaded {} ({} bytes) to s3://{}/{}",
            file.name,
            file.size(),
            self.bucket,
            key
        );
        Ok(file_id)
    }

    async fn file_urls(&self, file_id: &str) -> Result<FileUrls, StoreError> {
        let key = Self::key(file_id);

        self.client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| StoreError::Object(format!("file {file_id} unavailable: {e}")))?;

        Ok(FileUrls {
            preview_url: self.presign(&key, "inline".to_string()).await?,
            download_url: self
                .presign(&key, format!("attachment; filename=\"{file_id}\""))
                .await?,
        })
    }
}
