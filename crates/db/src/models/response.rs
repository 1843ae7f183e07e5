//! Response entity model and DTOs.

use cocosurvey_core::analysis::AnalysisResult;
use cocosurvey_core::answer::AnswerMap;
use cocosurvey_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Triage state of a response on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    New,
    InProgress,
    Done,
}

impl ResponseStatus {
    /// Decode a raw status string; anything unrecognized defaults to new.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "done" => ResponseStatus::Done,
            "in_progress" => ResponseStatus::InProgress,
            _ => ResponseStatus::New,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseStatus::New => "new",
            ResponseStatus::InProgress => "in_progress",
            ResponseStatus::Done => "done",
        }
    }
}

/// A response row from the `responses` table, JSONB documents still raw.
#[derive(Debug, Clone, FromRow)]
pub struct ResponseRow {
    pub id: DbId,
    pub form_id: DbId,
    pub org_id: DbId,
    pub respondent_id: String,
    pub answers: serde_json::Value,
    pub status: String,
    pub tags: Vec<String>,
    pub memo: String,
    pub assignee_uid: Option<String>,
    pub assignee_name: Option<String>,
    pub analysis: Option<serde_json::Value>,
    pub submitted_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A fully decoded response (see [`crate::decode::decode_response`]).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: DbId,
    pub form_id: DbId,
    pub org_id: DbId,
    pub respondent_id: String,
    pub answers: AnswerMap,
    pub status: ResponseStatus,
    pub tags: Vec<String>,
    pub memo: String,
    pub assignee_uid: Option<String>,
    pub assignee_name: Option<String>,
    pub analysis: Option<AnalysisResult>,
    pub submitted_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new response.
pub struct CreateResponse {
    pub form_id: DbId,
    pub org_id: DbId,
    pub respondent_id: String,
    pub answers: AnswerMap,
    pub analysis: Option<AnalysisResult>,
}

/// DTO for triage updates. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub status: Option<ResponseStatus>,
    pub tags: Option<Vec<String>>,
    pub memo: Option<String>,
    pub assignee_uid: Option<String>,
    pub assignee_name: Option<String>,
}
