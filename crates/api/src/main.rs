use std::net::SocketAddr;
use std::sync::Arc;

use cocosurvey_ai::{AnalysisClient, AnalysisSettings};
use cocosurvey_events::ResponseNotifier;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cocosurvey_api::config::ServerConfig;
use cocosurvey_api::router::build_app_router;
use cocosurvey_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cocosurvey_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = cocosurvey_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    cocosurvey_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    cocosurvey_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Analysis client ---
    let analysis = config.ai.api_key.as_ref().map(|api_key| {
        Arc::new(AnalysisClient::new(AnalysisSettings {
            api_key: api_key.clone(),
            model: config.ai.model.clone(),
            api_url: config.ai.api_url.clone(),
        }))
    });
    if analysis.is_some() {
        tracing::info!(model = %config.ai.model, "Analysis client configured");
    } else {
        tracing::warn!("GEMINI_API_KEY not set, analysis disabled");
    }

    // --- Notification fan-out ---
    let notifier = Arc::new(ResponseNotifier::from_env());

    // --- App state & router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        analysis,
        notifier,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
