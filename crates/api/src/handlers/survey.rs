//! Public respondent-facing handlers for the `/survey/{share_id}` routes.
//!
//! This is the submission pipeline: resolve the active form, validate the
//! visible fields, enforce the one-response-per-respondent invariant, run
//! the optional AI analysis, persist, and fan out notifications. Analysis
//! and notification failures never block a submission.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cocosurvey_core::analysis::{build_ai_text, extract_json, normalize, AnalysisResult};
use cocosurvey_core::answer::AnswerMap;
use cocosurvey_core::error::CoreError;
use cocosurvey_core::field::Field;
use cocosurvey_core::types::DbId;
use cocosurvey_core::validation::validate_answers;
use cocosurvey_db::models::form::Form;
use cocosurvey_db::models::response::{CreateResponse, Response};
use cocosurvey_db::repositories::{FormRepo, ResponseRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Respondent-facing view of an active form. Owner-only settings
/// (notification targets, AI configuration) are not exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicForm {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub share_id: String,
    pub fields: Vec<Field>,
}

impl From<Form> for PublicForm {
    fn from(form: Form) -> Self {
        PublicForm {
            id: form.id,
            title: form.title,
            description: form.description,
            share_id: form.share_id,
            fields: form.fields,
        }
    }
}

/// Request body for `POST /survey/{share_id}/responses`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Client-generated respondent token; combined with the form it forms
    /// the deterministic response identity.
    pub respondent_id: String,
    #[serde(default)]
    pub answers: AnswerMap,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/survey/{share_id}
///
/// Fetch an active form for a respondent. Draft forms are 404.
pub async fn get_by_share_id(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> AppResult<Json<DataResponse<PublicForm>>> {
    let form = FormRepo::find_active_by_share_id(&state.pool, &share_id)
        .await?
        .ok_or(AppError::NotFound("Form"))?;
    Ok(Json(DataResponse {
        data: PublicForm::from(form),
    }))
}

/// POST /api/v1/survey/{share_id}/responses
///
/// Submit a response. The pipeline, in order:
///
/// 1. Resolve the active form (404 otherwise).
/// 2. Validate every currently visible field; any failure aborts with 422
///    and the full field-id → message map, before any side effect.
/// 3. Reject duplicates proactively (409) before the analysis round-trip;
///    the unique constraint on insert stays authoritative under races.
/// 4. Run AI analysis per the form settings (failures degrade, never block).
/// 5. Persist, then fan out notifications in the background.
pub async fn submit(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
    Json(input): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Response>>)> {
    let form = FormRepo::find_active_by_share_id(&state.pool, &share_id)
        .await?
        .ok_or(AppError::NotFound("Form"))?;

    let respondent_id = input.respondent_id.trim().to_string();
    if respondent_id.is_empty() {
        return Err(AppError::BadRequest("respondentId is required".into()));
    }

    let errors = validate_answers(&form.fields, &input.answers);
    if !errors.is_empty() {
        return Err(AppError::ValidationFailed(errors));
    }

    if ResponseRepo::exists(&state.pool, form.id, &respondent_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already responded to this form.".into(),
        )));
    }

    let analysis = run_analysis(&state, &form, &input.answers).await;

    let created = ResponseRepo::create(
        &state.pool,
        &CreateResponse {
            form_id: form.id,
            org_id: form.org_id,
            respondent_id,
            answers: input.answers,
            analysis,
        },
    )
    .await?;

    // Notification fan-out happens off the request path; the respondent's
    // 201 does not wait for (or learn about) delivery outcomes.
    let notifier = Arc::clone(&state.notifier);
    let form_for_notify = form.clone();
    let response_for_notify = created.clone();
    tokio::spawn(async move {
        notifier
            .response_submitted(&form_for_notify, &response_for_notify)
            .await;
    });

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Build the sentiment/overall text blocks and run analysis per the form's
/// AI settings.
///
/// Returns `None` when analysis is disabled or there is nothing to analyze
/// (both blocks empty -- the external service is not called at all). Every
/// failure path -- missing credential, upstream error, unparseable output --
/// returns the degraded needs-review default instead of an error.
async fn run_analysis(state: &AppState, form: &Form, answers: &AnswerMap) -> Option<AnalysisResult> {
    if !form.ai_enabled {
        return None;
    }

    let sentiment_fields = form
        .fields
        .iter()
        .filter(|field| field.ai_enabled && field.field_type.is_free_text());
    let free_text = build_ai_text(sentiment_fields, answers);
    let overall_text = if form.ai_overall_enabled {
        build_ai_text(form.fields.iter(), answers)
    } else {
        String::new()
    };

    if free_text.is_empty() && overall_text.is_empty() {
        return None;
    }

    let Some(client) = state.analysis.as_deref() else {
        return Some(AnalysisResult::degraded(state.config.ai.model.as_str()));
    };

    let wants_sentiment = !free_text.is_empty();
    let wants_overall = !overall_text.is_empty();

    match client
        .generate(&free_text, &overall_text, wants_sentiment, wants_overall)
        .await
    {
        Ok(raw) => match extract_json(&raw) {
            Some(parsed) => Some(normalize(
                &parsed,
                wants_sentiment,
                wants_overall,
                form.ai_min_confidence,
                client.model(),
            )),
            None => Some(AnalysisResult::degraded(client.model())),
        },
        Err(error) => {
            tracing::warn!(
                form_id = form.id,
                %error,
                "Analysis call failed, attaching degraded default"
            );
            Some(AnalysisResult::degraded(client.model()))
        }
    }
}
