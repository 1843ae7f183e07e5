//! Route definitions for the `/forms` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{forms, responses, stats};
use crate::state::AppState;

/// Routes mounted at `/forms` (all require auth).
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// POST   /import           -> import (legacy document)
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/responses   -> list responses
/// GET    /{id}/stats       -> aggregation snapshot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(forms::list).post(forms::create))
        .route("/import", post(forms::import))
        .route(
            "/{id}",
            get(forms::get_by_id)
                .put(forms::update)
                .delete(forms::delete),
        )
        .route("/{id}/responses", get(responses::list_for_form))
        .route("/{id}/stats", get(stats::get_for_form))
}
