mod admin;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod schema;
mod state;
mod store;
mod submission;
#[cfg(test)]
mod testing;
mod wizard;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::admin::{AdminCredentials, AdminService};
use crate::config::{Config, SubmissionBackend};
use crate::db::{create_pool, ensure_schema};
use crate::routes::build_router;
use crate::schema::application::application_form;
use crate::state::AppState;
use crate::store::{PgSubmissionRepository, RedisSessionStore, S3ObjectStore};
use crate::submission::{DocumentStoreAdapter, EmailRelayAdapter, SubmissionAdapter};
use crate::wizard::{WizardService, WizardStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Intake API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let records = Arc::new(PgSubmissionRepository::new(db));
    let objects = Arc::new(S3ObjectStore::new(
        s3,
        config.s3_bucket.clone(),
        config.file_url_ttl,
    ));
    let sessions = Arc::new(RedisSessionStore::new(redis));

    let adapter: Arc<dyn SubmissionAdapter> = match config.submission_backend {
        SubmissionBackend::Document => {
            Arc::new(DocumentStoreAdapter::new(records.clone(), objects.clone()))
        }
        SubmissionBackend::Email => {
            let relay = config
                .relay
                .clone()
                .context("Email backend selected without relay configuration")?;
            Arc::new(EmailRelayAdapter::new(reqwest::Client::new(), relay))
        }
    };
    info!("Submission backend: {}", adapter.backend());

    let schema = Arc::new(application_form());
    let wizards = WizardStore::new(schema.clone());
    wizards.spawn_reaper(config.wizard_idle_ttl);

    let admin = AdminService::new(
        sessions,
        records,
        objects,
        AdminCredentials {
            email: config.admin_email.clone(),
            password: config.admin_password.clone(),
        },
        config.session_ttl,
    );

    // Build app state
    let state = AppState {
        schema,
        wizard: WizardService::new(wizards, adapter),
        admin,
        upload_limit: config.max_upload_bytes,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the hosted form's domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "intake-static",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
