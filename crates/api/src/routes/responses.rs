//! Route definitions for the `/responses` resource.

use axum::routing::patch;
use axum::Router;

use crate::handlers::responses;
use crate::state::AppState;

/// Routes mounted at `/responses` (all require auth).
///
/// ```text
/// PATCH /{id}   -> update (status/tags/memo/assignee)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", patch(responses::update))
}
