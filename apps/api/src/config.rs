use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_RELAY_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Which backend completed applications are submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionBackend {
    /// Record in PostgreSQL, identity-document images in the S3 bucket.
    Document,
    /// Templated email through the relay.
    Email,
}

impl FromStr for SubmissionBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(SubmissionBackend::Document),
            "email" => Ok(SubmissionBackend::Email),
            other => bail!("SUBMISSION_BACKEND must be 'document' or 'email', got '{other}'"),
        }
    }
}

/// Email relay identifiers. These ship to browsers in the hosted form and are not secrets.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub recipient_name: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub admin_email: String,
    pub admin_password: String,
    pub submission_backend: SubmissionBackend,
    /// Present only when `submission_backend` is `Email`.
    pub relay: Option<RelayConfig>,
    pub session_ttl: Duration,
    pub file_url_ttl: Duration,
    pub wizard_idle_ttl: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let submission_backend: SubmissionBackend =
            optional_env("SUBMISSION_BACKEND", "document").parse()?;
        let relay = match submission_backend {
            SubmissionBackend::Email => Some(RelayConfig {
                endpoint: optional_env("RELAY_ENDPOINT", DEFAULT_RELAY_ENDPOINT),
                service_id: require_env("RELAY_SERVICE_ID")?,
                template_id: require_env("RELAY_TEMPLATE_ID")?,
                public_key: require_env("RELAY_PUBLIC_KEY")?,
                recipient_name: optional_env("RELAY_RECIPIENT_NAME", "AKG Consulting"),
            }),
            SubmissionBackend::Document => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_region: optional_env("S3_REGION", "us-east-1"),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            admin_email: require_env("ADMIN_EMAIL")?,
            admin_password: require_env("ADMIN_PASSWORD")?,
            submission_backend,
            relay,
            session_ttl: Duration::from_secs(parse_env("SESSION_TTL_SECS", 8 * 60 * 60)?),
            file_url_ttl: Duration::from_secs(parse_env("FILE_URL_TTL_SECS", 15 * 60)?),
            wizard_idle_ttl: Duration::from_secs(parse_env("WIZARD_IDLE_TTL_SECS", 2 * 60 * 60)?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number")),
        Err(_) => Ok(default),
    }
}
