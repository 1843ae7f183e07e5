//! Handlers for response listing and triage updates.

use axum::extract::{Path, State};
use axum::Json;
use cocosurvey_core::types::DbId;
use cocosurvey_db::models::response::{Response, UpdateResponse};
use cocosurvey_db::repositories::{FormRepo, ResponseRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/forms/{id}/responses
///
/// List a form's responses, most recent first. 404 when the form is not in
/// the caller's organization.
pub async fn list_for_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(form_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Response>>>> {
    let form = FormRepo::find_by_id_for_org(&state.pool, form_id, user.org_id)
        .await?
        .ok_or(AppError::NotFound("Form"))?;
    let responses = ResponseRepo::list_by_form(&state.pool, form.id, user.org_id).await?;
    Ok(Json(DataResponse { data: responses }))
}

/// PATCH /api/v1/responses/{id}
///
/// Apply a triage update (status/tags/memo/assignee). Returns 404 if the
/// response is not in the caller's organization.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateResponse>,
) -> AppResult<Json<DataResponse<Response>>> {
    let response = ResponseRepo::update(&state.pool, id, user.org_id, &input)
        .await?
        .ok_or(AppError::NotFound("Response"))?;
    Ok(Json(DataResponse { data: response }))
}
