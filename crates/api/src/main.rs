use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epic_api::bootstrap;
use epic_api::config::{ServerConfig, DEFAULT_LOG_FILTER};
use epic_api::router::build_app_router;
use epic_api::state::AppState;
use epic_db::PgStore;
use epic_events::{ActivityLogger, EventBus};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        auto_activate_on_sign = config.workflow.auto_activate_client_on_sign,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = epic_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    epic_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    epic_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Activity bus ---
    let event_bus = Arc::new(EventBus::default());
    let logger_handle = tokio::spawn(ActivityLogger::run(event_bus.subscribe()));
    tracing::info!("Activity logger started");

    // --- App state ---
    let store = Arc::new(PgStore::new(pool));
    let state = AppState::new(store, event_bus.clone(), config.clone());

    if let Some(admin) = &config.bootstrap_admin {
        bootstrap::ensure_admin(state.store.as_ref(), admin)
            .await
            .expect("Failed to create bootstrap admin");
    }

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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // The workflow inside the router held the other sender clones; dropping
    // the last one closes the channel and lets the logger drain.
    drop(event_bus);
    match tokio::time::timeout(Duration::from_secs(5), logger_handle).await {
        Ok(Ok(logged)) => tracing::info!(logged, "Activity logger stopped"),
        Ok(Err(e)) => tracing::error!(error = %e, "Activity logger task failed"),
        Err(_) => tracing::warn!("Activity logger did not stop in time"),
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
