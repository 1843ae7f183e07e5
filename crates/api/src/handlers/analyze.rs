//! Handler for the analysis gateway endpoint.
//!
//! Thin HTTP surface over the text-classification client plus the
//! normalization in `cocosurvey_core::analysis`. The endpoint keeps the
//! contract of its original consumers: it returns the bare
//! [`AnalysisResult`] object (no `data` envelope), 500 when the credential
//! is missing, and 502 with `{ error, detail }` when the upstream service
//! fails.

use axum::extract::State;
use axum::Json;
use cocosurvey_ai::AnalysisApiError;
use cocosurvey_core::analysis::{
    extract_json, normalize, AnalysisResult, DEFAULT_MIN_CONFIDENCE,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /ai/analyze`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub free_text: String,
    #[serde(default)]
    pub overall_text: String,
    #[serde(default)]
    pub wants_sentiment: bool,
    #[serde(default)]
    pub wants_overall: bool,
    /// Defaults to 0.6 when omitted.
    #[serde(default)]
    pub min_confidence: Option<f64>,
}

/// POST /api/v1/ai/analyze
///
/// Classify the supplied text blocks. Empty input short-circuits to the
/// degraded default without calling the external service at all.
pub async fn analyze(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalysisResult>> {
    let Some(client) = state.analysis.as_deref() else {
        return Err(AppError::Config("GEMINI_API_KEY is not configured".into()));
    };

    let free_text = input.free_text.trim();
    let overall_text = input.overall_text.trim();
    let min_confidence = input.min_confidence.unwrap_or(DEFAULT_MIN_CONFIDENCE);

    if free_text.is_empty() && overall_text.is_empty() {
        return Ok(Json(AnalysisResult::degraded(client.model())));
    }

    let raw = client
        .generate(
            free_text,
            overall_text,
            input.wants_sentiment,
            input.wants_overall,
        )
        .await
        .map_err(|error| match error {
            AnalysisApiError::Api { status, body } => {
                tracing::error!(status, "Text-generation API returned an error");
                AppError::UpstreamAnalysis(body)
            }
            AnalysisApiError::Request(e) => AppError::UpstreamAnalysis(e.to_string()),
        })?;

    let result = match extract_json(&raw) {
        Some(parsed) => normalize(
            &parsed,
            input.wants_sentiment,
            input.wants_overall,
            min_confidence,
            client.model(),
        ),
        // Unparseable model output is "no result", not an error.
        None => AnalysisResult::degraded(client.model()),
    };

    Ok(Json(result))
}
