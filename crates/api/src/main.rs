use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use photoai_api::app::build_app;
use photoai_api::background;
use photoai_api::config::ServerConfig;
use photoai_api::state::AppState;
use photoai_falai::{FalAiClient, FalAiConfig};
use photoai_pipeline::JobCorrelator;
use photoai_storage::{S3Config, UploadGateway};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "photoai_api=debug,photoai_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    if config.webhook_secret.is_none() {
        tracing::warn!(
            "FAL_WEBHOOK_SECRET is not set; webhook signatures are not verified \
             and the webhook routes must be network-restricted"
        );
    }

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .map(|v| v.parse().expect("DATABASE_MAX_CONNECTIONS must be a valid u32"))
        .unwrap_or(photoai_db::DEFAULT_MAX_CONNECTIONS);

    let pool = photoai_db::create_pool(&database_url, max_connections)
        .await
        .expect("Failed to connect to database");
    tracing::info!(max_connections, "Database connection pool created");

    photoai_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    photoai_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Provider + storage ---
    let fal_config = FalAiConfig::from_env();
    tracing::info!(queue_url = %fal_config.queue_url, "fal.ai client configured");
    let provider = Arc::new(FalAiClient::new(fal_config));

    let s3_config = S3Config::from_env();
    let uploads = Arc::new(UploadGateway::new(&s3_config));
    tracing::info!(bucket = %uploads.bucket(), "Upload gateway configured");

    let pipeline = Arc::new(JobCorrelator::new(pool.clone(), provider));

    // --- Reconciliation ---
    let reconcile_cancel = CancellationToken::new();
    let reconcile_handle = tokio::spawn(background::reconciliation::run(
        pool.clone(),
        Duration::from_secs(config.reconcile_interval_secs),
        Duration::from_secs(config.placeholder_ttl_secs),
        reconcile_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline,
        uploads,
    };

    let app = build_app(state);

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

    reconcile_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), reconcile_handle).await;
    tracing::info!("Reconciliation job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
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
