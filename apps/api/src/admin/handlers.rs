use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::admin::service::SubmissionDetail;
use crate::errors::AppError;
use crate::models::submission::SubmissionSummary;
use crate::state::AppState;
use crate::store::Session;

/// A request carrying a live admin session as `Authorization: Bearer <token>`.
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let session = state
            .admin
            .current_session(token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AdminSession(session))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
    Login,
    Submissions {
        admin: String,
        submissions: Vec<SubmissionSummary>,
    },
}

/// POST /api/v1/admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.admin.login(&req.email, &req.password).await?))
}

/// POST /api/v1/admin/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.admin.logout(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/dashboard
///
/// Without a live session this answers with the login view rather than 401.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardView>, AppError> {
    let session = match bearer_token(&headers) {
        Some(token) => state.admin.current_session(token).await?,
        None => None,
    };
    let Some(session) = session else {
        return Ok(Json(DashboardView::Login));
    };
    let submissions = state.admin.list_submissions().await?;
    Ok(Json(DashboardView::Submissions {
        admin: session.email,
        submissions,
    }))
}

/// GET /api/v1/admin/submissions
pub async fn handle_list_submissions(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<SubmissionSummary>>, AppError> {
    Ok(Json(state.admin.list_submissions().await?))
}

/// GET /api/v1/admin/submissions/:id
pub async fn handle_get_submission(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionDetail>, AppError> {
    Ok(Json(state.admin.get_submission(id).await?))
}
