use std::sync::Arc;

use cocosurvey_ai::AnalysisClient;
use cocosurvey_events::ResponseNotifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cocosurvey_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Text-classification client; `None` when no credential is configured
    /// (submissions then attach the degraded default analysis).
    pub analysis: Option<Arc<AnalysisClient>>,
    /// Outbound notification fan-out for submitted responses.
    pub notifier: Arc<ResponseNotifier>,
}
