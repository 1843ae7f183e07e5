//! Handlers for the `/forms` resource.
//!
//! Form CRUD is org-scoped through the authenticated user. Saving a form
//! sanitizes its field list and rejects structurally invalid visibility
//! graphs (dangling references, self-references, cycles) before anything is
//! persisted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cocosurvey_core::field::{check_field_graph, sanitize_fields, Field};
use cocosurvey_core::types::DbId;
use cocosurvey_db::decode::decode_form_document;
use cocosurvey_db::models::form::{CreateForm, Form, UpdateForm};
use cocosurvey_db::repositories::FormRepo;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Generate an opaque share token for a new form.
fn new_share_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Sanitize a field list and reject invalid visibility graphs.
fn prepare_fields(fields: Vec<Field>) -> AppResult<Vec<Field>> {
    let fields = sanitize_fields(fields);
    check_field_graph(&fields)?;
    Ok(fields)
}

/// Treat empty strings from the form editor as unset optional values so
/// email/URL validation only applies to real input.
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// GET /api/v1/forms
///
/// List the organization's forms, most recently updated first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Form>>>> {
    let forms = FormRepo::list_by_org(&state.pool, user.org_id).await?;
    Ok(Json(DataResponse { data: forms }))
}

/// POST /api/v1/forms
///
/// Create a new form. Returns the created form with HTTP 201.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Form>>)> {
    input.notification_email = blank_to_none(input.notification_email.take());
    input.webhook_url = blank_to_none(input.webhook_url.take());
    input.slack_webhook_url = blank_to_none(input.slack_webhook_url.take());
    input.google_sheet_url = blank_to_none(input.google_sheet_url.take());
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    input.fields = prepare_fields(std::mem::take(&mut input.fields))?;

    let share_id = new_share_id();
    let form = FormRepo::create(&state.pool, user.org_id, user.user_id, &share_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// POST /api/v1/forms/import
///
/// Import a form document exported from the legacy store. The document is
/// decoded through the central boundary (duck-typed timestamps included)
/// and receives a fresh share token.
pub async fn import(
    State(state): State<AppState>,
    user: AuthUser,
    Json(document): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Form>>)> {
    let mut decoded = decode_form_document(&document);
    if decoded.title.is_empty() {
        return Err(AppError::BadRequest(
            "Imported document has no title".into(),
        ));
    }
    decoded.fields = prepare_fields(decoded.fields)?;

    let share_id = new_share_id();
    let form =
        FormRepo::create_imported(&state.pool, user.org_id, user.user_id, &share_id, &decoded)
            .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// GET /api/v1/forms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = FormRepo::find_by_id_for_org(&state.pool, id, user.org_id)
        .await?
        .ok_or(AppError::NotFound("Form"))?;
    Ok(Json(DataResponse { data: form }))
}

/// PUT /api/v1/forms/{id}
///
/// Update an existing form. Returns 404 if not found in the org.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateForm>,
) -> AppResult<Json<DataResponse<Form>>> {
    input.notification_email = blank_to_none(input.notification_email.take());
    input.webhook_url = blank_to_none(input.webhook_url.take());
    input.slack_webhook_url = blank_to_none(input.slack_webhook_url.take());
    input.google_sheet_url = blank_to_none(input.google_sheet_url.take());
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if let Some(fields) = input.fields.take() {
        input.fields = Some(prepare_fields(fields)?);
    }

    let form = FormRepo::update(&state.pool, id, user.org_id, &input)
        .await?
        .ok_or(AppError::NotFound("Form"))?;
    Ok(Json(DataResponse { data: form }))
}

/// DELETE /api/v1/forms/{id}
///
/// Delete a form and (via cascade) its responses. Returns 204 on success.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = FormRepo::delete(&state.pool, id, user.org_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Form"))
    }
}
