//! Repository for the `responses` table.

use cocosurvey_core::types::DbId;
use sqlx::PgPool;

use crate::decode::decode_response;
use crate::models::response::{CreateResponse, Response, ResponseRow, ResponseStatus, UpdateResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, form_id, org_id, respondent_id, answers, status, tags, memo, \
                       assignee_uid, assignee_name, analysis, submitted_at, updated_at";

/// Provides CRUD operations for responses.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Insert a new response, returning the decoded row.
    ///
    /// A second submission for the same (form, respondent) pair violates
    /// `uq_responses_form_respondent`; the resulting database error is the
    /// authoritative "already responded" signal.
    pub async fn create(pool: &PgPool, input: &CreateResponse) -> Result<Response, sqlx::Error> {
        let query = format!(
            "INSERT INTO responses (form_id, org_id, respondent_id, answers, analysis)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let answers = serde_json::to_value(&input.answers)
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()));
        let analysis = input
            .analysis
            .as_ref()
            .and_then(|analysis| serde_json::to_value(analysis).ok());
        let row = sqlx::query_as::<_, ResponseRow>(&query)
            .bind(input.form_id)
            .bind(input.org_id)
            .bind(&input.respondent_id)
            .bind(answers)
            .bind(analysis)
            .fetch_one(pool)
            .await?;
        Ok(decode_response(row))
    }

    /// Whether a response already exists for this (form, respondent) pair.
    ///
    /// The proactive duplicate check before any analysis call; the unique
    /// constraint remains the source of truth under races.
    pub async fn exists(
        pool: &PgPool,
        form_id: DbId,
        respondent_id: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM responses WHERE form_id = $1 AND respondent_id = $2)",
        )
        .bind(form_id)
        .bind(respondent_id)
        .fetch_one(pool)
        .await
    }

    /// Find a response by ID within an organization.
    pub async fn find_by_id_for_org(
        pool: &PgPool,
        id: DbId,
        org_id: DbId,
    ) -> Result<Option<Response>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM responses WHERE id = $1 AND org_id = $2");
        let row = sqlx::query_as::<_, ResponseRow>(&query)
            .bind(id)
            .bind(org_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(decode_response))
    }

    /// List a form's responses, most recent first.
    pub async fn list_by_form(
        pool: &PgPool,
        form_id: DbId,
        org_id: DbId,
    ) -> Result<Vec<Response>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM responses
             WHERE form_id = $1 AND org_id = $2
             ORDER BY submitted_at DESC"
        );
        let rows = sqlx::query_as::<_, ResponseRow>(&query)
            .bind(form_id)
            .bind(org_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(decode_response).collect())
    }

    /// Apply a triage update (status/tags/memo/assignee). Only non-`None`
    /// fields are applied. Returns `None` if no row matches.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        org_id: DbId,
        input: &UpdateResponse,
    ) -> Result<Option<Response>, sqlx::Error> {
        let query = format!(
            "UPDATE responses SET
                status = COALESCE($3, status),
                tags = COALESCE($4, tags),
                memo = COALESCE($5, memo),
                assignee_uid = COALESCE($6, assignee_uid),
                assignee_name = COALESCE($7, assignee_name),
                updated_at = NOW()
             WHERE id = $1 AND org_id = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ResponseRow>(&query)
            .bind(id)
            .bind(org_id)
            .bind(input.status.map(ResponseStatus::as_str))
            .bind(&input.tags)
            .bind(&input.memo)
            .bind(&input.assignee_uid)
            .bind(&input.assignee_name)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(decode_response))
    }
}
