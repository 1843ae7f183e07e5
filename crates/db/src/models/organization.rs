//! Organization entity model.

use cocosurvey_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An organization row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
