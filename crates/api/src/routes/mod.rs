pub mod ai;
pub mod auth;
pub mod forms;
pub mod health;
pub mod responses;
pub mod survey;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                     create org + owner, log in (public)
/// /auth/login                      login (public)
/// /auth/refresh                    refresh (public)
/// /auth/logout                     logout (requires auth)
/// /auth/me                         current user profile (requires auth)
///
/// /forms                           list, create (requires auth)
/// /forms/import                    import legacy document (requires auth)
/// /forms/{id}                      get, update, delete
/// /forms/{id}/responses            list responses
/// /forms/{id}/stats                aggregation snapshot
///
/// /responses/{id}                  triage update (PATCH)
///
/// /survey/{share_id}               public form fetch
/// /survey/{share_id}/responses     public submission
///
/// /ai/analyze                      analysis gateway (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/forms", forms::router())
        .nest("/responses", responses::router())
        .nest("/survey", survey::router())
        .nest("/ai", ai::router())
}
