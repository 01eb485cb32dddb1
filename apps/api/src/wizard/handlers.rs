use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::schema::{FieldValue, FileHandle, FormSchema};
use crate::state::AppState;
use crate::wizard::state::{Action, Confirmation};
use crate::wizard::view::WizardView;

const FILE_PART: &str = "file";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Client-dispatchable actions. Submission has its own route and is never accepted here.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionRequest {
    SetValue { field: String, value: InputValue },
    ClearValue { field: String },
    Next,
    Previous,
    DismissError,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Bool(bool),
    Text(String),
}

impl From<ActionRequest> for Action {
    fn from(req: ActionRequest) -> Self {
        match req {
            ActionRequest::SetValue { field, value } => Action::SetValue {
                field,
                value: match value {
                    InputValue::Bool(b) => FieldValue::Bool(b),
                    InputValue::Text(s) => FieldValue::Text(s),
                },
            },
            ActionRequest::ClearValue { field } => Action::ClearValue { field },
            ActionRequest::Next => Action::Next,
            ActionRequest::Previous => Action::Previous,
            ActionRequest::DismissError => Action::DismissError,
        }
    }
}

/// GET /api/v1/form
pub async fn handle_get_form(State(state): State<AppState>) -> Json<FormSchema> {
    Json(state.schema.as_ref().clone())
}

/// POST /api/v1/wizard
pub async fn handle_start(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<WizardView>), AppError> {
    let view = state.wizard.start().await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/wizard/:id
pub async fn handle_get_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(state.wizard.view(id).await?))
}

/// POST /api/v1/wizard/:id/actions
pub async fn handle_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActionRequest>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(state.wizard.dispatch(id, req.into()).await?))
}

/// POST /api/v1/wizard/:id/files/:field
///
/// Multipart body with a single part named `file`. Only presence is recorded; type and
/// size are not checked beyond the transport body limit.
pub async fn handle_upload_file(
    State(state): State<AppState>,
    Path((id, field)): Path<(Uuid, String)>,
    mut multipart: Multipart,
) -> Result<Json<WizardView>, AppError> {
    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if part.name() != Some(FILE_PART) {
            continue;
        }
        let name = part.file_name().unwrap_or(field.as_str()).to_string();
        let content_type = part
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes: Bytes = part
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        debug!("Received {} bytes for field '{field}' of wizard {id}", bytes.len());

        let file = FileHandle {
            name,
            content_type,
            bytes,
        };
        let view = state
            .wizard
            .dispatch(
                id,
                Action::SetValue {
                    field,
                    value: FieldValue::File(file),
                },
            )
            .await?;
        return Ok(Json(view));
    }

    Err(AppError::Validation(format!(
        "Multipart body must contain a part named '{FILE_PART}'"
    )))
}

/// POST /api/v1/wizard/:id/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(state.wizard.submit(id).await?))
}

/// GET /api/v1/wizard/:id/confirmation
pub async fn handle_confirmation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Confirmation>, AppError> {
    Ok(Json(state.wizard.confirmation(id).await?))
}
