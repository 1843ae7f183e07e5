//! Route definitions for the `/ai` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::analyze;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST /analyze   -> analyze (public; called from the survey page)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze::analyze))
}
