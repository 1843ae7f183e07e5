//! Form entity model and DTOs.

use cocosurvey_core::field::Field;
use cocosurvey_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Lifecycle state of a form. Only `active` forms are reachable through
/// their share token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Draft,
    Active,
}

impl FormStatus {
    /// Decode a raw status string; anything but "active" defaults to draft.
    pub fn parse(raw: &str) -> Self {
        if raw == "active" {
            FormStatus::Active
        } else {
            FormStatus::Draft
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormStatus::Draft => "draft",
            FormStatus::Active => "active",
        }
    }
}

/// A form row from the `forms` table, `fields` document still raw.
#[derive(Debug, Clone, FromRow)]
pub struct FormRow {
    pub id: DbId,
    pub org_id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub share_id: String,
    pub fields: serde_json::Value,
    pub ai_enabled: bool,
    pub ai_overall_enabled: bool,
    pub ai_min_confidence: f64,
    pub notification_email: Option<String>,
    pub webhook_url: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub google_sheet_url: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A fully decoded form (see [`crate::decode::decode_form`]).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: DbId,
    pub org_id: DbId,
    pub title: String,
    pub description: String,
    pub status: FormStatus,
    pub share_id: String,
    pub fields: Vec<Field>,
    pub ai_enabled: bool,
    pub ai_overall_enabled: bool,
    pub ai_min_confidence: f64,
    pub notification_email: Option<String>,
    pub webhook_url: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub google_sheet_url: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to draft if omitted.
    #[serde(default)]
    pub status: Option<FormStatus>,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub ai_enabled: bool,
    #[serde(default)]
    pub ai_overall_enabled: bool,
    /// Defaults to 0.6 if omitted.
    #[serde(default)]
    pub ai_min_confidence: Option<f64>,
    #[validate(email)]
    pub notification_email: Option<String>,
    #[validate(url)]
    pub webhook_url: Option<String>,
    #[validate(url)]
    pub slack_webhook_url: Option<String>,
    #[validate(url)]
    pub google_sheet_url: Option<String>,
}

/// DTO for updating an existing form. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<FormStatus>,
    pub fields: Option<Vec<Field>>,
    pub ai_enabled: Option<bool>,
    pub ai_overall_enabled: Option<bool>,
    pub ai_min_confidence: Option<f64>,
    #[validate(email)]
    pub notification_email: Option<String>,
    #[validate(url)]
    pub webhook_url: Option<String>,
    #[validate(url)]
    pub slack_webhook_url: Option<String>,
    #[validate(url)]
    pub google_sheet_url: Option<String>,
}
