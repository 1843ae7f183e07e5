//! Route definitions for the public `/survey` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::survey;
use crate::state::AppState;

/// Routes mounted at `/survey` (public, no auth).
///
/// ```text
/// GET  /{share_id}             -> get_by_share_id (active forms only)
/// POST /{share_id}/responses   -> submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{share_id}", get(survey::get_by_share_id))
        .route("/{share_id}/responses", post(survey::submit))
}
