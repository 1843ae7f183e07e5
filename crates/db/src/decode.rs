//! The JSONB document decoding boundary.
//!
//! Every read path that touches a loosely-typed document -- the `fields`
//! array on forms, the `answers` and `analysis` documents on responses, and
//! whole form documents arriving through the legacy import endpoint -- goes
//! through this module. Coercion and defaulting live here and nowhere else:
//! unknown status strings default to draft/new, malformed field entries are
//! skipped, non-numeric scores become null, and duck-typed timestamps fall
//! back to now.

use cocosurvey_core::analysis::{AnalysisResult, SentimentLabel, DEFAULT_MIN_CONFIDENCE};
use cocosurvey_core::answer::{AnswerMap, AnswerValue};
use cocosurvey_core::coerce::to_timestamp;
use cocosurvey_core::field::Field;
use cocosurvey_core::types::Timestamp;
use serde_json::Value;

use crate::models::form::{Form, FormRow, FormStatus};
use crate::models::response::{Response, ResponseRow, ResponseStatus};

/// Decode a form row into a typed [`Form`].
pub fn decode_form(row: FormRow) -> Form {
    Form {
        id: row.id,
        org_id: row.org_id,
        title: row.title,
        description: row.description,
        status: FormStatus::parse(&row.status),
        share_id: row.share_id,
        fields: decode_fields(&row.fields),
        ai_enabled: row.ai_enabled,
        ai_overall_enabled: row.ai_overall_enabled,
        ai_min_confidence: row.ai_min_confidence,
        notification_email: row.notification_email,
        webhook_url: row.webhook_url,
        slack_webhook_url: row.slack_webhook_url,
        google_sheet_url: row.google_sheet_url,
        created_by: row.created_by,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Decode a response row into a typed [`Response`].
pub fn decode_response(row: ResponseRow) -> Response {
    Response {
        id: row.id,
        form_id: row.form_id,
        org_id: row.org_id,
        respondent_id: row.respondent_id,
        answers: decode_answers(&row.answers),
        status: ResponseStatus::parse(&row.status),
        tags: row.tags,
        memo: row.memo,
        assignee_uid: row.assignee_uid,
        assignee_name: row.assignee_name,
        analysis: row.analysis.as_ref().map(decode_analysis),
        submitted_at: row.submitted_at,
        updated_at: row.updated_at,
    }
}

/// Decode a `fields` document. Non-arrays decode to an empty list; entries
/// that fail to deserialize are skipped with a warning rather than poisoning
/// the whole form.
pub fn decode_fields(raw: &Value) -> Vec<Field> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(field) => Some(field),
            Err(error) => {
                tracing::warn!(%error, "Skipping malformed field document entry");
                None
            }
        })
        .collect()
}

/// Decode one raw answer value. Numbers coerce to their text rendering;
/// array entries that are not strings are dropped; anything else
/// unrecognized becomes null.
pub fn decode_answer_value(raw: &Value) -> AnswerValue {
    match raw {
        Value::Bool(checked) => AnswerValue::Checked(*checked),
        Value::String(text) => AnswerValue::Text(text.clone()),
        Value::Number(number) => AnswerValue::Text(number.to_string()),
        Value::Array(items) => AnswerValue::Multi(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        _ => AnswerValue::Null,
    }
}

/// Decode an `answers` document. Non-objects decode to an empty map.
pub fn decode_answers(raw: &Value) -> AnswerMap {
    let Some(entries) = raw.as_object() else {
        return AnswerMap::new();
    };
    entries
        .iter()
        .map(|(field_id, value)| (field_id.clone(), decode_answer_value(value)))
        .collect()
}

/// Decode a stored `analysis` document into the fixed result schema.
pub fn decode_analysis(raw: &Value) -> AnalysisResult {
    AnalysisResult {
        overall_score: raw
            .get("overallScore")
            .and_then(Value::as_f64)
            .map(|score| score.round() as i32),
        sentiment_label: raw
            .get("sentimentLabel")
            .and_then(Value::as_str)
            .map(SentimentLabel::parse)
            .unwrap_or(SentimentLabel::NeedsReview),
        confidence: raw.get("confidence").and_then(Value::as_f64).unwrap_or(0.0),
        keywords: raw
            .get("keywords")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        model: raw
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

/// A whole form document from the legacy store, decoded for import.
#[derive(Debug, Clone)]
pub struct FormDocument {
    pub title: String,
    pub description: String,
    pub status: FormStatus,
    pub fields: Vec<Field>,
    pub ai_enabled: bool,
    pub ai_overall_enabled: bool,
    pub ai_min_confidence: f64,
    pub notification_email: Option<String>,
    pub webhook_url: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub google_sheet_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn non_empty_string(raw: Option<&Value>) -> Option<String> {
    raw.and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Decode an exported legacy form document, applying the same defaults the
/// source system applied on read. Timestamps may arrive as RFC 3339 strings,
/// epoch milliseconds, or `{seconds, nanoseconds}` objects.
pub fn decode_form_document(doc: &Value) -> FormDocument {
    FormDocument {
        title: doc
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        description: doc
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        status: doc
            .get("status")
            .and_then(Value::as_str)
            .map(FormStatus::parse)
            .unwrap_or(FormStatus::Draft),
        fields: decode_fields(doc.get("fields").unwrap_or(&Value::Null)),
        ai_enabled: doc
            .get("aiEnabled")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        ai_overall_enabled: doc
            .get("aiOverallEnabled")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        ai_min_confidence: doc
            .get("aiMinConfidence")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_MIN_CONFIDENCE),
        notification_email: non_empty_string(doc.get("notificationEmail")),
        webhook_url: non_empty_string(doc.get("webhookUrl")),
        slack_webhook_url: non_empty_string(doc.get("slackWebhookUrl")),
        google_sheet_url: non_empty_string(doc.get("googleSheetUrl")),
        created_at: to_timestamp(doc.get("createdAt").unwrap_or(&Value::Null)),
        updated_at: to_timestamp(doc.get("updatedAt").unwrap_or(&Value::Null)),
    }
}
