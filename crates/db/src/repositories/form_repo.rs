//! Repository for the `forms` table.

use cocosurvey_core::field::Field;
use cocosurvey_core::types::DbId;
use sqlx::PgPool;

use crate::decode::{decode_form, FormDocument};
use crate::models::form::{CreateForm, Form, FormRow, FormStatus, UpdateForm};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, org_id, title, description, status, share_id, fields, \
                       ai_enabled, ai_overall_enabled, ai_min_confidence, \
                       notification_email, webhook_url, slack_webhook_url, \
                       google_sheet_url, created_by, created_at, updated_at";

/// Serialize a field list for a JSONB bind.
fn fields_document(fields: &[Field]) -> serde_json::Value {
    serde_json::to_value(fields).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
}

/// Provides CRUD operations for forms.
pub struct FormRepo;

impl FormRepo {
    /// Insert a new form, returning the decoded row.
    ///
    /// Callers sanitize and graph-check `input.fields` before this point.
    /// If `status` or `ai_min_confidence` is `None`, defaults to draft / 0.6.
    pub async fn create(
        pool: &PgPool,
        org_id: DbId,
        created_by: DbId,
        share_id: &str,
        input: &CreateForm,
    ) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (org_id, title, description, status, share_id, fields,
                                ai_enabled, ai_overall_enabled, ai_min_confidence,
                                notification_email, webhook_url, slack_webhook_url,
                                google_sheet_url, created_by)
             VALUES ($1, $2, $3, COALESCE($4, 'draft'), $5, $6, $7, $8, COALESCE($9, 0.6),
                     $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, FormRow>(&query)
            .bind(org_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.map(FormStatus::as_str))
            .bind(share_id)
            .bind(fields_document(&input.fields))
            .bind(input.ai_enabled)
            .bind(input.ai_overall_enabled)
            .bind(input.ai_min_confidence)
            .bind(&input.notification_email)
            .bind(&input.webhook_url)
            .bind(&input.slack_webhook_url)
            .bind(&input.google_sheet_url)
            .bind(created_by)
            .fetch_one(pool)
            .await?;
        Ok(decode_form(row))
    }

    /// Insert a form decoded from a legacy export, preserving its original
    /// timestamps.
    pub async fn create_imported(
        pool: &PgPool,
        org_id: DbId,
        created_by: DbId,
        share_id: &str,
        doc: &FormDocument,
    ) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (org_id, title, description, status, share_id, fields,
                                ai_enabled, ai_overall_enabled, ai_min_confidence,
                                notification_email, webhook_url, slack_webhook_url,
                                google_sheet_url, created_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, FormRow>(&query)
            .bind(org_id)
            .bind(&doc.title)
            .bind(&doc.description)
            .bind(doc.status.as_str())
            .bind(share_id)
            .bind(fields_document(&doc.fields))
            .bind(doc.ai_enabled)
            .bind(doc.ai_overall_enabled)
            .bind(doc.ai_min_confidence)
            .bind(&doc.notification_email)
            .bind(&doc.webhook_url)
            .bind(&doc.slack_webhook_url)
            .bind(&doc.google_sheet_url)
            .bind(created_by)
            .bind(doc.created_at)
            .bind(doc.updated_at)
            .fetch_one(pool)
            .await?;
        Ok(decode_form(row))
    }

    /// Find a form by ID within an organization.
    pub async fn find_by_id_for_org(
        pool: &PgPool,
        id: DbId,
        org_id: DbId,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1 AND org_id = $2");
        let row = sqlx::query_as::<_, FormRow>(&query)
            .bind(id)
            .bind(org_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(decode_form))
    }

    /// Find an active form by its public share token. Draft forms are not
    /// reachable this way.
    pub async fn find_active_by_share_id(
        pool: &PgPool,
        share_id: &str,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM forms WHERE share_id = $1 AND status = 'active'");
        let row = sqlx::query_as::<_, FormRow>(&query)
            .bind(share_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(decode_form))
    }

    /// List an organization's forms, most recently updated first.
    pub async fn list_by_org(pool: &PgPool, org_id: DbId) -> Result<Vec<Form>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM forms WHERE org_id = $1 ORDER BY updated_at DESC");
        let rows = sqlx::query_as::<_, FormRow>(&query)
            .bind(org_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(decode_form).collect())
    }

    /// Update a form. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists in the org.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        org_id: DbId,
        input: &UpdateForm,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!(
            "UPDATE forms SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                fields = COALESCE($6, fields),
                ai_enabled = COALESCE($7, ai_enabled),
                ai_overall_enabled = COALESCE($8, ai_overall_enabled),
                ai_min_confidence = COALESCE($9, ai_min_confidence),
                notification_email = COALESCE($10, notification_email),
                webhook_url = COALESCE($11, webhook_url),
                slack_webhook_url = COALESCE($12, slack_webhook_url),
                google_sheet_url = COALESCE($13, google_sheet_url),
                updated_at = NOW()
             WHERE id = $1 AND org_id = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, FormRow>(&query)
            .bind(id)
            .bind(org_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.map(FormStatus::as_str))
            .bind(input.fields.as_deref().map(fields_document))
            .bind(input.ai_enabled)
            .bind(input.ai_overall_enabled)
            .bind(input.ai_min_confidence)
            .bind(&input.notification_email)
            .bind(&input.webhook_url)
            .bind(&input.slack_webhook_url)
            .bind(&input.google_sheet_url)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(decode_form))
    }

    /// Delete a form by ID within an organization. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId, org_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
