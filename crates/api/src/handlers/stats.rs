//! Handler for the per-form statistics endpoint.

use axum::extract::{Path, State};
use axum::Json;
use cocosurvey_core::stats::{compute_stats, ResponseStats};
use cocosurvey_core::types::DbId;
use cocosurvey_db::repositories::{FormRepo, ResponseRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/forms/{id}/stats
///
/// Compute summary statistics over the form's responses: completion rate,
/// average answered fields, option distribution, top keywords, and the
/// lexicon sentiment tally. Nothing is cached or persisted; the numbers are
/// derived from the current response set on every call.
pub async fn get_for_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(form_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ResponseStats>>> {
    let form = FormRepo::find_by_id_for_org(&state.pool, form_id, user.org_id)
        .await?
        .ok_or(AppError::NotFound("Form"))?;
    let responses = ResponseRepo::list_by_form(&state.pool, form.id, user.org_id).await?;

    let answer_sets: Vec<_> = responses
        .into_iter()
        .map(|response| response.answers)
        .collect();
    let stats = compute_stats(&form.fields, &answer_sets);

    Ok(Json(DataResponse { data: stats }))
}
